//! Assignment and completion records supplied by the surrounding system.

use crate::date;
use crate::error::{QcError, Result};
use crate::paths::validate_id;
use crate::types::Frequency;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// "This machine owes this recurring QC worksheet from `start_date`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub machine_id: String,
    pub worksheet_id: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Assignment {
    pub fn new(
        machine_id: impl Into<String>,
        worksheet_id: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Result<Self> {
        let machine_id = machine_id.into();
        let worksheet_id = worksheet_id.into();
        validate_id(&machine_id)?;
        validate_id(&worksheet_id)?;
        Ok(Self {
            machine_id,
            worksheet_id,
            frequency,
            start_date,
            end_date: None,
        })
    }

    /// Terminate the recurrence. The end date may not precede the start.
    pub fn with_end(mut self, end_date: NaiveDate) -> Result<Self> {
        self.set_end(Some(end_date))?;
        Ok(self)
    }

    pub fn set_end(&mut self, end_date: Option<NaiveDate>) -> Result<()> {
        if let Some(end) = end_date {
            if end < self.start_date {
                return Err(QcError::InvalidRange {
                    start: date::format_date(self.start_date),
                    end: date::format_date(end),
                });
            }
        }
        self.end_date = end_date;
        Ok(())
    }

    pub fn is_for(&self, machine_id: &str, worksheet_id: &str) -> bool {
        self.machine_id == machine_id && self.worksheet_id == worksheet_id
    }

    /// A completion counts toward this assignment when machine, worksheet
    /// and frequency all agree.
    pub fn matches(&self, completion: &Completion) -> bool {
        self.is_for(&completion.machine_id, &completion.worksheet_id)
            && self.frequency == completion.frequency
    }

    /// Whether the assignment is still running on `today`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && self.end_date.map_or(true, |end| today <= end)
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// A QC run actually performed. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    pub machine_id: String,
    pub worksheet_id: String,
    pub frequency: Frequency,
    /// Calendar date the QC was performed.
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<String>,
}

impl Completion {
    pub fn new(
        machine_id: impl Into<String>,
        worksheet_id: impl Into<String>,
        frequency: Frequency,
        date: NaiveDate,
    ) -> Result<Self> {
        let machine_id = machine_id.into();
        let worksheet_id = worksheet_id.into();
        validate_id(&machine_id)?;
        validate_id(&worksheet_id)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            machine_id,
            worksheet_id,
            frequency,
            date,
            recorded_at: Utc::now(),
            performed_by: None,
        })
    }

    /// Completion for an assignment, inheriting its machine, worksheet and
    /// frequency.
    pub fn for_assignment(assignment: &Assignment, date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            machine_id: assignment.machine_id.clone(),
            worksheet_id: assignment.worksheet_id.clone(),
            frequency: assignment.frequency,
            date,
            recorded_at: Utc::now(),
            performed_by: None,
        }
    }

    pub fn performed_by(mut self, who: impl Into<String>) -> Self {
        self.performed_by = Some(who.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
