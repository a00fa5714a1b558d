//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative in-memory task list and its persisted mirror.
//! - Keep front ends decoupled from storage details.

pub mod task_store;
