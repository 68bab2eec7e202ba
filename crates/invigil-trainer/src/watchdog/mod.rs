//! Watchdog pipeline: object-detection training for suspicious-object
//! flagging, exported to ONNX for browser-side inference.

pub mod dataset;
pub mod download;
pub mod export;
pub mod train;
pub mod validate;

pub use dataset::DatasetConfig;
pub use download::RoboflowSource;
pub use export::export_to_onnx;
pub use train::{ModelSize, TrainParams};
pub use validate::run_validation;
