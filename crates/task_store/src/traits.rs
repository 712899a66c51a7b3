//! Task store trait definitions.

use async_trait::async_trait;
use entities::{NewTask, Task, TaskUpdate};

use crate::TaskStoreResult;

/// Filter options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks attached to this device.
    pub device_id: Option<i32>,
}

impl TaskFilter {
    /// Filters by device.
    pub fn with_device(mut self, device_id: i32) -> Self {
        self.device_id = Some(device_id);
        self
    }
}

/// Trait for task storage operations.
///
/// Listing always orders by priority rank (critical, important, then
/// everything else), newest `entry_date` first within a rank.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task and returns the stored row.
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task>;

    /// Lists tasks with optional filters.
    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Gets a task by ID.
    async fn get_task(&self, id: i32) -> TaskStoreResult<Option<Task>>;

    /// Applies a partial update and returns the updated row.
    ///
    /// An empty update writes nothing and returns the current row.
    async fn update_task(&self, id: i32, update: TaskUpdate) -> TaskStoreResult<Task>;

    /// Deletes a task and returns the deleted row.
    async fn delete_task(&self, id: i32) -> TaskStoreResult<Task>;

    /// Returns true if a device with the given ID exists.
    async fn device_exists(&self, id: i32) -> TaskStoreResult<bool>;
}
