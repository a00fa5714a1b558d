//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-list load/save contract the task store persists through.
//! - Isolate file-format details from store/business orchestration.
//!
//! # Invariants
//! - `save` replaces the persisted list wholesale; there is no append path.
//! - A missing backing file loads as an empty list, never as an error.

pub mod task_file;
