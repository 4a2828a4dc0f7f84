//! Samaya Core - Shared types library.
//!
//! This crate provides common types used across all Samaya components:
//! - `storefront` - Public-facing watch store
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The backend
//! service owns every entity; these types are the client-side projections
//! both binaries agree on.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
