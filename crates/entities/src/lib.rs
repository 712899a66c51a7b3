//! Core entity definitions for the maintenance task API.
//!
//! This crate defines the data types shared by the storage layer and the
//! HTTP server: maintenance tasks, the devices they are attached to, and the
//! enumerated values a task's priority and mode may take.

mod device;
mod task;

pub use device::*;
pub use task::*;
