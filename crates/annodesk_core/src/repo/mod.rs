//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate requests before any SQL mutation.
//! - Engine errors are wrapped, never rewritten.

pub mod annotation_repo;
