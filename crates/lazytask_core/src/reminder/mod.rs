//! Deadline reminder entry points.
//!
//! # Responsibility
//! - Select pending tasks whose deadline falls inside the lookahead window.
//! - Offer a cooperative cadence helper for hosts that poll on a loop.
//!
//! # Invariants
//! - Scanning is read-only and stateless; repeated calls over the same
//!   input return the same reminders.
//! - Deduplicating repeated notifications is left to the caller.

pub mod scan;
