//! Domain Layer - Hashcash logic
//!
//! This layer contains:
//! - The header value object and its wire codec
//! - Domain services (mining, verification, bit test)

pub mod header;
pub mod services;
