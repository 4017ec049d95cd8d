//! Shared utilities and common types for the catalog backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Decoding of business tokens issued by the identity server
//! - Field validation helpers shared by request DTOs

pub mod jwt;
pub mod validation;
