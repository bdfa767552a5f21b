//! Core use-case services.
//!
//! # Responsibility
//! - Validate requests before any storage round trip.
//! - Keep host/UI layers decoupled from storage details.

pub mod annotation_service;
pub mod payload;
