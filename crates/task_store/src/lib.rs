//! Task storage for the maintenance task API.
//!
//! This crate provides a storage abstraction for maintenance tasks and the
//! devices they reference. [`PgTaskStore`] talks to PostgreSQL through a
//! shared `sqlx` connection pool; [`MemoryTaskStore`] keeps everything in
//! process and mirrors the table constraints, which makes it suitable for
//! tests.

mod error;
mod memory;
mod postgres;
mod traits;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use traits::*;

pub use sqlx;
