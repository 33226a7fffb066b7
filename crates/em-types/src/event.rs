use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a transition hook relative to the persistence commit point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Runs before the commit; a failure aborts the save.
    Before,
    /// Runs once the commit has been confirmed.
    After,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// An observed change of one attribute, as reported by the persistence
/// adapter. `None` stands for "no value set".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub attribute: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl ChangeEvent {
    pub fn new(attribute: impl Into<String>, old: Option<&str>, new: Option<&str>) -> Self {
        Self {
            attribute: attribute.into(),
            old: old.map(str::to_owned),
            new: new.map(str::to_owned),
        }
    }

    /// Build an event only if `persisted` and `current` differ.
    pub fn detect(
        attribute: impl Into<String>,
        persisted: Option<&str>,
        current: Option<&str>,
    ) -> Option<Self> {
        if persisted == current {
            None
        } else {
            Some(Self::new(attribute, persisted, current))
        }
    }

    /// Persisted value, `None` when the record had none.
    pub fn old_value(&self) -> Option<&str> {
        self.old.as_deref()
    }

    /// Value being committed.
    pub fn new_value(&self) -> Option<&str> {
        self.new.as_deref()
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.attribute,
            self.old.as_deref().unwrap_or("<absent>"),
            self.new.as_deref().unwrap_or("<absent>")
        )
    }
}
