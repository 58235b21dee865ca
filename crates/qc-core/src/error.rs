use thiserror::Error;

#[derive(Debug, Error)]
pub enum QcError {
    #[error("not initialized: run 'qc init'")]
    NotInitialized,

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown frequency '{0}': must be daily, weekly, monthly, quarterly, or annual")]
    UnknownFrequency(String),

    #[error("invalid period '{period}' for {frequency} frequency")]
    InvalidPeriod { period: String, frequency: String },

    #[error("invalid id '{0}': must be 1-64 characters of letters, digits, '.', '_' or '-'")]
    InvalidId(String),

    #[error("invalid range: end date {end} is before start date {start}")]
    InvalidRange { start: String, end: String },

    #[error("assignment not found: {machine_id}/{worksheet_id}")]
    AssignmentNotFound {
        machine_id: String,
        worksheet_id: String,
    },

    #[error("assignment already exists: {machine_id}/{worksheet_id}")]
    AssignmentExists {
        machine_id: String,
        worksheet_id: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, QcError>;
