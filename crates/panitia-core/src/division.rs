use crate::error::{PanitiaError, Result};
use crate::task::Task;
use crate::types::TaskStatus;
use serde::{Deserialize, Serialize};

/// A named grouping that owns an ordered list of tasks. Task ids are
/// unique within the division only, not globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Division {
    /// Build a division, rejecting an empty name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PanitiaError::EmptyField("division name"));
        }
        Ok(Self {
            name,
            tasks: Vec::new(),
        })
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a task, keeping insertion order. Declined when the id is
    /// already taken within this division.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if self.find_task(&task.id).is_some() {
            return Err(PanitiaError::TaskExists {
                division: self.name.clone(),
                id: task.id,
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Remove a task by id. Returns false when absent.
    pub fn remove_task(&mut self, id: &str) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(pos) => {
                self.tasks.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PanitiaError::TaskNotFound(id.to_string()))?;
        task.status = status;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_task_id_is_declined() {
        let mut division = Division::new("Acara").unwrap();
        division.add_task(Task::new("T1", "a", "")).unwrap();
        let err = division.add_task(Task::new("T1", "b", "")).unwrap_err();
        assert!(matches!(err, PanitiaError::TaskExists { .. }));
        assert_eq!(division.tasks.len(), 1);
        assert_eq!(division.tasks[0].title, "a");
    }

    #[test]
    fn remove_task_is_a_noop_when_absent() {
        let mut division = Division::new("Acara").unwrap();
        division.add_task(Task::new("T1", "a", "")).unwrap();
        assert!(division.remove_task("T1"));
        assert!(!division.remove_task("T1"));
        assert!(division.tasks.is_empty());
    }

    #[test]
    fn set_task_status_transitions() {
        let mut division = Division::new("Acara").unwrap();
        division.add_task(Task::new("T1", "a", "")).unwrap();
        division.set_task_status("T1", TaskStatus::Done).unwrap();
        assert_eq!(division.find_task("T1").unwrap().status, TaskStatus::Done);
        assert!(division.set_task_status("T9", TaskStatus::Done).is_err());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(Division::new("  ").is_err());
    }
}
