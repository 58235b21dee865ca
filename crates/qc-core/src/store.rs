//! Collaborator seams for assignment and completion data.
//!
//! The engine never owns this data. Callers hand it a registry and a log,
//! either the in-memory [`MemoryStore`] or the file-backed [`YamlStore`]
//! under `<root>/.qc/`.

use crate::error::{QcError, Result};
use crate::io;
use crate::model::{Assignment, Completion};
use crate::paths;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait AssignmentRegistry {
    fn assignments(&self) -> Result<Vec<Assignment>>;

    fn find(&self, machine_id: &str, worksheet_id: &str) -> Result<Assignment> {
        self.assignments()?
            .into_iter()
            .find(|a| a.is_for(machine_id, worksheet_id))
            .ok_or_else(|| QcError::AssignmentNotFound {
                machine_id: machine_id.to_string(),
                worksheet_id: worksheet_id.to_string(),
            })
    }
}

/// Append-only record of performed QC.
pub trait CompletionLog {
    fn completions(&self) -> Result<Vec<Completion>>;
    fn append(&mut self, completion: Completion) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub assignments: Vec<Assignment>,
    pub completions: Vec<Completion>,
}

impl MemoryStore {
    pub fn new(assignments: Vec<Assignment>, completions: Vec<Completion>) -> Self {
        Self {
            assignments,
            completions,
        }
    }
}

impl AssignmentRegistry for MemoryStore {
    fn assignments(&self) -> Result<Vec<Assignment>> {
        Ok(self.assignments.clone())
    }
}

impl CompletionLog for MemoryStore {
    fn completions(&self) -> Result<Vec<Completion>> {
        Ok(self.completions.clone())
    }

    fn append(&mut self, completion: Completion) -> Result<()> {
        self.completions.push(completion);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// YamlStore
// ---------------------------------------------------------------------------

/// Layout:
///   .qc/assignments.yaml   list of assignments, unique per machine/worksheet
///   .qc/completions.yaml   list of completions, append-only
#[derive(Debug, Clone)]
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    pub fn open(root: &Path) -> Result<Self> {
        if !paths::qc_dir(root).is_dir() {
            return Err(QcError::NotInitialized);
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Create the store files if missing. Existing data is left alone.
    pub fn init(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(paths::qc_dir(root))?;
        io::seed_empty_list(&paths::assignments_path(root))?;
        io::seed_empty_list(&paths::completions_path(root))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_assignment(&self, assignment: Assignment) -> Result<()> {
        let mut all = self.assignments()?;
        if all
            .iter()
            .any(|a| a.is_for(&assignment.machine_id, &assignment.worksheet_id))
        {
            return Err(QcError::AssignmentExists {
                machine_id: assignment.machine_id,
                worksheet_id: assignment.worksheet_id,
            });
        }
        all.push(assignment);
        io::write_yaml(&paths::assignments_path(&self.root), &all)
    }

    /// Replace an assignment in place (new dates or frequency).
    pub fn update_assignment(&self, assignment: Assignment) -> Result<()> {
        let mut all = self.assignments()?;
        let slot = all
            .iter_mut()
            .find(|a| a.is_for(&assignment.machine_id, &assignment.worksheet_id))
            .ok_or_else(|| QcError::AssignmentNotFound {
                machine_id: assignment.machine_id.clone(),
                worksheet_id: assignment.worksheet_id.clone(),
            })?;
        *slot = assignment;
        io::write_yaml(&paths::assignments_path(&self.root), &all)
    }

    pub fn remove_assignment(&self, machine_id: &str, worksheet_id: &str) -> Result<Assignment> {
        let mut all = self.assignments()?;
        let pos = all
            .iter()
            .position(|a| a.is_for(machine_id, worksheet_id))
            .ok_or_else(|| QcError::AssignmentNotFound {
                machine_id: machine_id.to_string(),
                worksheet_id: worksheet_id.to_string(),
            })?;
        let removed = all.remove(pos);
        io::write_yaml(&paths::assignments_path(&self.root), &all)?;
        Ok(removed)
    }
}

impl AssignmentRegistry for YamlStore {
    fn assignments(&self) -> Result<Vec<Assignment>> {
        io::read_yaml(&paths::assignments_path(&self.root))
    }
}

impl CompletionLog for YamlStore {
    fn completions(&self) -> Result<Vec<Completion>> {
        io::read_yaml(&paths::completions_path(&self.root))
    }

    fn append(&mut self, completion: Completion) -> Result<()> {
        let mut all: Vec<Completion> = self.completions()?;
        all.push(completion);
        io::write_yaml(&paths::completions_path(&self.root), &all)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
