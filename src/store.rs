use crate::clock::Clock;
use crate::domain::{compute_stats, FilterState, Priority, Task, TaskStats};
use crate::persistence::{codec, StorageBackend, TASKS_KEY};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Why a task mutation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("a task with this title already exists")]
    DuplicateTitle,
    #[error("no task with id {0}")]
    NotFound(Uuid),
}

/// Owns the authoritative task list and writes it through to storage on
/// every mutation. The vector is kept stable-sorted by `order`, so views
/// iterate it front to back.
pub struct TaskStore<S, C> {
    tasks: Vec<Task>,
    storage: S,
    clock: C,
}

impl<S: StorageBackend, C: Clock> TaskStore<S, C> {
    /// Load the store from its backend. A missing key or malformed blob
    /// yields an empty store rather than an error.
    pub fn load(storage: S, clock: C) -> Self {
        let mut tasks = match storage.load(TASKS_KEY) {
            Ok(Some(blob)) => codec::decode_tasks(&blob, clock.now()),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("failed to read task storage: {err:#}");
                Vec::new()
            }
        };
        tasks.sort_by_key(|t| t.order);

        Self {
            tasks,
            storage,
            clock,
        }
    }

    /// Add a new task at the end of the list
    pub fn add(
        &mut self,
        title: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if self.tasks.iter().any(|t| t.title_matches(title)) {
            return Err(StoreError::DuplicateTitle);
        }

        let task = Task::new(
            title.to_string(),
            due_date,
            priority,
            self.tasks.len(),
            self.clock.now(),
        );
        self.tasks.push(task.clone());
        self.persist();
        Ok(task)
    }

    /// Rename a task. The duplicate check excludes the task being edited.
    pub fn edit_title(&mut self, id: Uuid, new_title: &str) -> Result<Task, StoreError> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;

        let new_title = new_title.trim();
        if new_title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if self
            .tasks
            .iter()
            .any(|t| t.id != id && t.title_matches(new_title))
        {
            return Err(StoreError::DuplicateTitle);
        }

        let now = self.clock.now();
        let task = &mut self.tasks[index];
        task.title = new_title.to_string();
        task.updated_at = now;
        let task = task.clone();

        self.persist();
        Ok(task)
    }

    /// Flip a task's completed state
    pub fn toggle_complete(&mut self, id: Uuid) -> Result<Task, StoreError> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;

        let now = self.clock.now();
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        task.updated_at = now;
        let task = task.clone();

        self.persist();
        Ok(task)
    }

    /// Remove a task. Remaining `order` values are left as-is; gaps are
    /// harmless since views only need relative order.
    pub fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        self.tasks.remove(index);
        self.persist();
        Ok(())
    }

    /// Remove all completed tasks, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        self.persist();
        removed
    }

    /// Move a task so it sits immediately before the target task, then
    /// reassign `order` densely as 0..n-1.
    pub fn reorder(&mut self, moved_id: Uuid, target_id: Uuid) -> Result<(), StoreError> {
        let moved_index = self.index_of(moved_id).ok_or(StoreError::NotFound(moved_id))?;
        self.index_of(target_id)
            .ok_or(StoreError::NotFound(target_id))?;

        if moved_id == target_id {
            return Ok(());
        }

        let task = self.tasks.remove(moved_index);
        // Target index after removal, so the moved task lands right before it
        let target_index = self
            .tasks
            .iter()
            .position(|t| t.id == target_id)
            .ok_or(StoreError::NotFound(target_id))?;
        self.tasks.insert(target_index, task);

        for (i, t) in self.tasks.iter_mut().enumerate() {
            t.order = i;
        }

        self.persist();
        Ok(())
    }

    /// Lazy read-only view of the tasks passing the given filter/search,
    /// in stored order
    pub fn view<'a>(&'a self, state: &'a FilterState) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| state.matches(t))
    }

    /// All tasks in stored order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Aggregate counts as of the injected clock's today
    pub fn stats(&self) -> TaskStats {
        compute_stats(&self.tasks, self.clock.today())
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Write-through persistence. A failure is logged and never reverts
    /// the in-memory mutation.
    fn persist(&mut self) {
        match codec::encode_tasks(&self.tasks) {
            Ok(blob) => {
                if let Err(err) = self.storage.store(TASKS_KEY, &blob) {
                    log::warn!("failed to persist tasks: {err:#}");
                }
            }
            Err(err) => log::warn!("failed to serialize tasks: {err}"),
        }
    }
}
