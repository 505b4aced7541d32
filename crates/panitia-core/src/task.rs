use crate::types::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DEADLINE_FMT: &str = "%Y-%m-%d";

/// A unit of work owned by exactly one division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            deadline: None,
            status: TaskStatus::default(),
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    // ---------------------------------------------------------------------------
    // Wire format: id|title|description|deadline|status
    // ---------------------------------------------------------------------------

    /// Encode the task payload of a `TASK|` line. The deadline field is
    /// empty when unset.
    pub fn encode(&self) -> String {
        let deadline = self
            .deadline
            .map(|d| d.format(DEADLINE_FMT).to_string())
            .unwrap_or_default();
        format!(
            "{}|{}|{}|{}|{}",
            self.id, self.title, self.description, deadline, self.status
        )
    }

    /// Decode the payload of a `TASK|` line. Exactly 5 pipe-separated
    /// fields are required; an unparseable status falls back to TODO and
    /// an unparseable deadline to unset.
    pub fn decode(payload: &str) -> Option<Self> {
        let parts: Vec<&str> = payload.split('|').collect();
        let [id, title, description, deadline, status] = parts.as_slice() else {
            return None;
        };
        Some(Self {
            id: (*id).to_string(),
            title: (*title).to_string(),
            description: (*description).to_string(),
            deadline: NaiveDate::parse_from_str(deadline, DEADLINE_FMT).ok(),
            status: status.parse().unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
