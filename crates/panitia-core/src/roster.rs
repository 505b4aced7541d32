use crate::error::{PanitiaError, Result};
use serde::{Deserialize, Serialize};

/// A committee member's profile record, independent of login credentials.
/// `division` is free text and need not match an existing division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub division: String,
    pub phone: String,
}

impl RosterEntry {
    /// Build an entry, rejecting empty id or name.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        division: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(PanitiaError::EmptyField("id"));
        }
        if name.trim().is_empty() {
            return Err(PanitiaError::EmptyField("name"));
        }
        Ok(Self {
            id,
            name,
            division: division.into(),
            phone: phone.into(),
        })
    }

    // ---------------------------------------------------------------------------
    // Wire format: id,name,division,phone
    // ---------------------------------------------------------------------------

    pub fn encode(&self) -> String {
        format!("{},{},{},{}", self.id, self.name, self.division, self.phone)
    }

    /// Decode an `anggota.txt` line. A line with fewer than 4 comma-separated
    /// fields is malformed; returns `None`.
    pub fn decode(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.splitn(4, ',').collect();
        let [id, name, division, phone] = parts.as_slice() else {
            return None;
        };
        Some(Self {
            id: (*id).to_string(),
            name: (*name).to_string(),
            division: (*division).to_string(),
            phone: (*phone).to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
