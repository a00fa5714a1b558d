//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define the canonical task record shared by every front end.
//! - Provide the deadline/priority helpers front ends rely on.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` that survives reordering.
//! - `completed` only ever transitions from `false` to `true`.

pub mod task;
