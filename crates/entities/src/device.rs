//! Device entity definitions.

use serde::{Deserialize, Serialize};

/// A device that maintenance tasks are attached to.
///
/// Devices are managed outside this API; tasks only reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier.
    pub deviceid: i32,
}

impl Device {
    /// Creates a device reference.
    pub fn new(deviceid: i32) -> Self {
        Self { deviceid }
    }
}
