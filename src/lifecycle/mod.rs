//! Index-lifecycle domain model and the per-tick reconciler.
//!
//! Operators describe each managed index family with a descriptor (name
//! prefix, calendar periodicity, retention window, pre-create flag). Every
//! scheduler tick the reconciler re-reads those descriptors, enforces the
//! retention window by deleting expired partitions and pre-creates the next
//! period's partition where requested.
mod metadata;
mod pattern;
mod reconciler;
mod retention;

pub use metadata::*;
pub use pattern::*;
pub use reconciler::*;
pub use retention::*;

#[cfg(test)]
mod pattern_test;
