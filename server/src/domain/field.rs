//! Tri-state value for fields mirrored between the database and descriptor files

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A syncable field.
///
/// `Unset` means the database holds no value, so a descriptor file may supply
/// one. `Empty` and `Set` are both authoritative database values and are
/// written over whatever the file contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Unset,
    Empty,
    Set(String),
}

impl Field {
    /// Build from a nullable database column
    pub fn from_db(value: Option<String>) -> Self {
        match value {
            None => Field::Unset,
            Some(s) if s.is_empty() => Field::Empty,
            Some(s) => Field::Set(s),
        }
    }

    /// Value for a nullable database column
    pub fn to_db(&self) -> Option<String> {
        self.as_str().map(str::to_string)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Unset => None,
            Field::Empty => Some(""),
            Field::Set(s) => Some(s),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Field::Empty
        } else {
            Field::Set(value.to_string())
        }
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Field::Empty
        } else {
            Field::Set(value)
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(Field::from_db)
    }
}
