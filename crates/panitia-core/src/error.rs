use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanitiaError {
    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("roster entry already exists: {0}")]
    RosterEntryExists(String),

    #[error("roster entry not found: {0}")]
    RosterEntryNotFound(String),

    #[error("division already exists: {0}")]
    DivisionExists(String),

    #[error("division not found: {0}")]
    DivisionNotFound(String),

    #[error("task already exists in division '{division}': {id}")]
    TaskExists { division: String, id: String },

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PanitiaError>;
