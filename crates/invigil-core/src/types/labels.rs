use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvigilError;

/// Object classes the watchdog detector is trained on.
///
/// The integer indices are a contract with the browser-side inference
/// consumer: the exported ONNX model emits class ids, and the web app maps
/// them back to names with this exact table. Never reorder or renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchdogClass {
    MobilePhone,
    Book,
    Notes,
    Earphone,
    SecondaryScreen,
    ExtraPerson,
    HandGesture,
    Laptop,
}

impl WatchdogClass {
    /// All classes in index order (0..=7).
    pub const ALL: [WatchdogClass; 8] = [
        Self::MobilePhone,
        Self::Book,
        Self::Notes,
        Self::Earphone,
        Self::SecondaryScreen,
        Self::ExtraPerson,
        Self::HandGesture,
        Self::Laptop,
    ];

    /// Number of detector classes.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the frozen class index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::MobilePhone => 0,
            Self::Book => 1,
            Self::Notes => 2,
            Self::Earphone => 3,
            Self::SecondaryScreen => 4,
            Self::ExtraPerson => 5,
            Self::HandGesture => 6,
            Self::Laptop => 7,
        }
    }

    /// Looks up a class by its frozen index.
    ///
    /// # Errors
    ///
    /// Returns `InvigilError::ClassIndexOutOfRange` for indices above 7.
    pub fn from_index(index: usize) -> crate::Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvigilError::ClassIndexOutOfRange(index))
    }

    /// The label-file name for this class.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MobilePhone => "mobile_phone",
            Self::Book => "book",
            Self::Notes => "notes",
            Self::Earphone => "earphone",
            Self::SecondaryScreen => "secondary_screen",
            Self::ExtraPerson => "extra_person",
            Self::HandGesture => "hand_gesture",
            Self::Laptop => "laptop",
        }
    }
}

impl fmt::Display for WatchdogClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Regression pin: index drift silently corrupts labels already shipped
    // to the browser consumer.
    #[test]
    fn class_index_mapping_is_frozen() {
        let expected = [
            (0, "mobile_phone"),
            (1, "book"),
            (2, "notes"),
            (3, "earphone"),
            (4, "secondary_screen"),
            (5, "extra_person"),
            (6, "hand_gesture"),
            (7, "laptop"),
        ];

        for (index, name) in expected {
            let class = WatchdogClass::from_index(index).unwrap();
            assert_eq!(class.index(), index);
            assert_eq!(class.name(), name);
        }
        assert_eq!(WatchdogClass::COUNT, 8);
    }

    #[test]
    fn all_ordering_matches_indices() {
        for (i, class) in WatchdogClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert!(matches!(
            WatchdogClass::from_index(8),
            Err(InvigilError::ClassIndexOutOfRange(8))
        ));
    }

    #[test]
    fn class_serialization_uses_label_names() {
        let json = serde_json::to_string(&WatchdogClass::SecondaryScreen).unwrap();
        assert_eq!(json, "\"secondary_screen\"");

        let back: WatchdogClass = serde_json::from_str("\"extra_person\"").unwrap();
        assert_eq!(back, WatchdogClass::ExtraPerson);
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(WatchdogClass::MobilePhone.to_string(), "mobile_phone");
        assert_eq!(WatchdogClass::Laptop.to_string(), "laptop");
    }
}
