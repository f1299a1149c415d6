//! Domain model for stored facts.
//!
//! # Invariants
//! - Every fact is identified by a backend-assigned integer `FactId`.
//! - Deletion is permanent; there are no tombstones.

pub mod fact;
