use crate::types::Role;
use serde::{Deserialize, Serialize};

/// A login credential record. The role is carried as the variant tag;
/// only members reference a roster entry, and that reference may dangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Account {
    Admin {
        username: String,
        password: String,
        display_name: String,
    },
    Member {
        username: String,
        password: String,
        display_name: String,
        roster_id: String,
    },
}

impl Account {
    pub fn admin(
        username: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Account::Admin {
            username: username.into(),
            password: password.into(),
            display_name: display_name.into(),
        }
    }

    pub fn member(
        username: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
        roster_id: impl Into<String>,
    ) -> Self {
        Account::Member {
            username: username.into(),
            password: password.into(),
            display_name: display_name.into(),
            roster_id: roster_id.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Admin { .. } => Role::Admin,
            Account::Member { .. } => Role::Member,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Account::Admin { username, .. } | Account::Member { username, .. } => username,
        }
    }

    pub fn password(&self) -> &str {
        match self {
            Account::Admin { password, .. } | Account::Member { password, .. } => password,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Account::Admin { display_name, .. } | Account::Member { display_name, .. } => {
                display_name
            }
        }
    }

    /// The linked roster id, if this is a member account.
    pub fn roster_id(&self) -> Option<&str> {
        match self {
            Account::Admin { .. } => None,
            Account::Member { roster_id, .. } => Some(roster_id),
        }
    }

    pub fn set_password(&mut self, new_password: impl Into<String>) {
        match self {
            Account::Admin { password, .. } | Account::Member { password, .. } => {
                *password = new_password.into();
            }
        }
    }

    pub fn set_display_name(&mut self, new_name: impl Into<String>) {
        match self {
            Account::Admin { display_name, .. } | Account::Member { display_name, .. } => {
                *display_name = new_name.into();
            }
        }
    }

    // ---------------------------------------------------------------------------
    // Wire format: type,username,password,displayName,linkedRosterId
    // ---------------------------------------------------------------------------

    /// Encode as an `accounts.txt` line. The roster link field is empty
    /// for admin rows.
    pub fn encode(&self) -> String {
        match self {
            Account::Admin {
                username,
                password,
                display_name,
            } => format!("ADMIN,{username},{password},{display_name},"),
            Account::Member {
                username,
                password,
                display_name,
                roster_id,
            } => format!("MEMBER,{username},{password},{display_name},{roster_id}"),
        }
    }

    /// Decode an `accounts.txt` line. Returns `None` for malformed rows.
    /// An admin row written without the trailing empty field is accepted.
    pub fn decode(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.splitn(5, ',').collect();
        match parts.as_slice() {
            ["ADMIN", username, password, display_name]
            | ["ADMIN", username, password, display_name, _] => {
                Some(Account::admin(*username, *password, *display_name))
            }
            ["MEMBER", username, password, display_name, roster_id] => {
                Some(Account::member(*username, *password, *display_name, *roster_id))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
