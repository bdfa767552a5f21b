//! Domain model for annotations and categories.
//!
//! # Responsibility
//! - Define write requests validated before any engine round trip.
//! - Define read models returned by list/page queries.
//!
//! # Invariants
//! - Identifiers are engine-assigned positive integers, never reused.
//! - Records are created only; this crate exposes no update/delete paths.

pub mod annotation;
pub mod category;
pub mod page;
pub mod validation;
