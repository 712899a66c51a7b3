//! JSON request and response definitions for the maintenance task API.
//!
//! Request bodies keep each recognized field as a raw JSON value so the
//! server can tell a missing field from an empty one. Validation turns them
//! into the typed payloads the storage layer accepts.

mod error;
mod requests;
mod responses;

pub use error::*;
pub use requests::*;
pub use responses::*;
