//! The in-memory task list and its mutation API.
//!
//! `TaskList` owns the tasks and the `Store`, and is the only code that writes
//! the data file. Every successful mutation is saved immediately and then
//! reported to a `Presenter`, which receives the full snapshot and redraws.
//!
//! Rejected operations (`TaskError`) leave the list, the file and the
//! presenter untouched. A failed save does not roll back the change: the
//! presenter is told via `save_failed` and the in-memory list stays
//! authoritative.

use tracing::{debug, warn};

use crate::error::{StoreError, TaskError};
use crate::store::Store;
use crate::task::Task;

/// Derived counts over the current list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Summary {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// A removal awaiting the user's yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    pub index: usize,
    pub text: String,
}

/// The presentation side of the task list.
pub trait Presenter {
    /// Redraw everything from this snapshot. Called after every mutation.
    fn render(&mut self, tasks: &[Task], summary: Summary);

    /// Ask the user to confirm a removal. On "yes", the caller passes the
    /// request back to [`TaskList::confirm_remove`].
    fn confirm_removal(&mut self, request: RemovalRequest);

    /// The change was applied in memory but could not be written.
    fn save_failed(&mut self, error: &StoreError);
}

/// Owned, authoritative task list.
#[derive(Debug)]
pub struct TaskList {
    tasks: Vec<Task>,
    store: Store,
}

impl TaskList {
    /// Load the list from `store`. A missing or corrupt file yields an empty list.
    pub fn initialize(store: Store) -> Self {
        let tasks = store.load();
        TaskList { tasks, store }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.tasks)
    }

    /// Append a new open task. Returns its index.
    pub fn add(&mut self, raw: &str, presenter: &mut dyn Presenter) -> Result<usize, TaskError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        self.tasks.push(Task::now(text));
        let index = self.tasks.len() - 1;
        debug!(index, "task added");
        self.commit(presenter);
        Ok(index)
    }

    /// Flip the completion flag of the task at `index`. Returns the new value.
    pub fn toggle(&mut self, index: usize, presenter: &mut dyn Presenter) -> Result<bool, TaskError> {
        self.check(index)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let completed = task.completed;
        debug!(index, completed, "task toggled");
        self.commit(presenter);
        Ok(completed)
    }

    /// First step of removal: validate and ask the presenter to confirm.
    pub fn request_remove(&self, index: usize, presenter: &mut dyn Presenter) -> Result<(), TaskError> {
        self.check(index)?;
        presenter.confirm_removal(RemovalRequest {
            index,
            text: self.tasks[index].text.clone(),
        });
        Ok(())
    }

    /// Second step of removal, only after the user said yes.
    pub fn confirm_remove(
        &mut self,
        request: RemovalRequest,
        presenter: &mut dyn Presenter,
    ) -> Result<Task, TaskError> {
        self.check(request.index)?;
        let removed = self.tasks.remove(request.index);
        debug!(index = request.index, "task removed");
        self.commit(presenter);
        Ok(removed)
    }

    fn check(&self, index: usize) -> Result<(), TaskError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(TaskError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            })
        }
    }

    fn commit(&self, presenter: &mut dyn Presenter) {
        if let Err(e) = self.store.save(&self.tasks) {
            warn!(error = %e, "save failed, keeping in-memory change");
            presenter.save_failed(&e);
        }
        presenter.render(&self.tasks, self.summary());
    }
}
