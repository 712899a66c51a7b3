//! In-memory task store implementation for testing.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashSet},
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::Utc;
use entities::{Device, Mode, NewTask, Priority, Task, TaskUpdate};
use tokio::sync::RwLock;

use crate::{Constraint, TaskFilter, TaskStore, TaskStoreError, TaskStoreResult};

/// In-memory task store for testing purposes.
///
/// Enforces the same check and foreign-key rules as the `task` table, in the
/// same order PostgreSQL evaluates them: check constraints first, then the
/// device reference.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<BTreeMap<i32, Task>>>,
    devices: Arc<RwLock<HashSet<i32>>>,
    last_task_id: Arc<AtomicI32>,
}

impl MemoryTaskStore {
    /// Creates a new in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already knows the given devices.
    pub fn with_devices(device_ids: impl IntoIterator<Item = i32>) -> Self {
        Self {
            devices: Arc::new(RwLock::new(device_ids.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Registers a device.
    pub async fn add_device(&self, device: Device) -> Device {
        self.devices.write().await.insert(device.deviceid);
        device
    }
}

fn check_priority(priority: &str) -> TaskStoreResult<()> {
    match priority.parse::<Priority>() {
        Ok(parsed) if parsed.as_str() == priority => Ok(()),
        _ => Err(TaskStoreError::check_violation(Constraint::TaskPriority)),
    }
}

fn check_mode(mode: &str) -> TaskStoreResult<()> {
    match mode.parse::<Mode>() {
        Ok(parsed) if parsed.as_str() == mode => Ok(()),
        _ => Err(TaskStoreError::check_violation(Constraint::TaskMode)),
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let priority = task.priority.to_lowercase();
        let mode = task.mode.to_lowercase();
        check_priority(&priority)?;
        check_mode(&mode)?;

        if !self.devices.read().await.contains(&task.deviceid) {
            return Err(TaskStoreError::foreign_key_violation(Constraint::TaskDevice));
        }

        let taskid = self.last_task_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Task {
            taskid,
            entry_date: Utc::now(),
            description: task.description,
            priority,
            mode,
            deviceid: task.deviceid,
        };

        self.tasks.write().await.insert(taskid, created.clone());
        Ok(created)
    }

    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| filter.device_id.is_none_or(|id| t.deviceid == id))
            .cloned()
            .collect();
        result.sort_by_key(|t| (t.priority_rank(), Reverse(t.entry_date), Reverse(t.taskid)));
        Ok(result)
    }

    async fn get_task(&self, id: i32) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn update_task(&self, id: i32, update: TaskUpdate) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.get_mut(&id) else {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        };

        let mut updated = task.clone();
        update.apply_to(&mut updated);
        updated.priority = updated.priority.to_lowercase();
        updated.mode = updated.mode.to_lowercase();
        check_priority(&updated.priority)?;
        check_mode(&updated.mode)?;

        *task = updated.clone();
        Ok(updated)
    }

    async fn delete_task(&self, id: i32) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks
            .remove(&id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))
    }

    async fn device_exists(&self, id: i32) -> TaskStoreResult<bool> {
        Ok(self.devices.read().await.contains(&id))
    }
}
