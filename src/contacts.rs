//! Phone number to display name mapping
//!
//! The mapping is produced outside this crate from a contacts export. On
//! disk it is a flat JSON object: `{"+358401234567": "John Doe", ...}`.
//! Keys may or may not carry a leading `+`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ArchiveError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    by_phone: HashMap<String, String>,
}

impl Contacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON contacts mapping file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let by_phone: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|source| ArchiveError::Contacts {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { by_phone })
    }

    pub fn get(&self, phone: &str) -> Option<&str> {
        self.by_phone.get(phone).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_phone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_phone.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Contacts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            by_phone: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
