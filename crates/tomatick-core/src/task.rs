//! Task checklist.
//!
//! A plain ordered list of to-do items. It has no coupling to the timer:
//! completing a pomodoro does not touch tasks and vice versa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    /// Trimmed, never empty.
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Whitespace-only text is ignored and yields `None`.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.tasks.push(Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        });
        self.tasks.last()
    }

    /// Flip the completed flag. Returns the new value, or `None` for an unknown id.
    pub fn toggle(&mut self, id: Uuid) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Remove a task. Unknown ids are a no-op returning `None`.
    pub fn delete(&mut self, id: Uuid) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Drop every completed task, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Id of the task shown at 1-based `position`.
    pub fn id_at(&self, position: usize) -> Result<Uuid, ValidationError> {
        position
            .checked_sub(1)
            .and_then(|i| self.tasks.get(i))
            .map(|t| t.id)
            .ok_or(ValidationError::OutOfBounds {
                collection: "task".into(),
                index: position,
                len: self.tasks.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks not yet completed.
    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_text() {
        let mut list = TaskList::new();
        let task = list.add("  write report \n").unwrap();
        assert_eq!(task.text, "write report");
        assert!(!task.completed);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn whitespace_only_text_is_ignored() {
        let mut list = TaskList::new();
        assert!(list.add("   \t").is_none());
        assert!(list.add("").is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut list = TaskList::new();
        let a = list.add("a").unwrap().id;
        let b = list.add("a").unwrap().id;
        assert_ne!(a, b);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut list = TaskList::new();
        let id = list.add("read").unwrap().id;
        assert_eq!(list.toggle(id), Some(true));
        assert_eq!(list.toggle(id), Some(false));
        assert!(!list.get(id).unwrap().completed);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut list = TaskList::new();
        list.add("keep");
        assert!(list.toggle(Uuid::new_v4()).is_none());
        assert!(list.delete(Uuid::new_v4()).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn delete_removes_only_target() {
        let mut list = TaskList::new();
        let first = list.add("first").unwrap().id;
        let second = list.add("second").unwrap().id;
        let removed = list.delete(first).unwrap();
        assert_eq!(removed.text, "first");
        assert_eq!(list.id_at(1).unwrap(), second);
    }

    #[test]
    fn id_at_is_one_based() {
        let mut list = TaskList::new();
        let id = list.add("only").unwrap().id;
        assert_eq!(list.id_at(1).unwrap(), id);
        assert!(list.id_at(0).is_err());
        assert!(list.id_at(2).is_err());
    }

    #[test]
    fn clear_completed_keeps_open_tasks() {
        let mut list = TaskList::new();
        let done = list.add("done").unwrap().id;
        list.add("open");
        list.toggle(done);
        assert_eq!(list.remaining(), 1);
        assert_eq!(list.clear_completed(), 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().unwrap().text, "open");
    }
}
