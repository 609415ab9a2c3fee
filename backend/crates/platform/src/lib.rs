//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, Base64, OS randomness)
//! - Stream connection and connection handler abstractions
//! - Cooperative shutdown signal
//! - TCP connection listener

pub mod connection;
pub mod crypto;
pub mod listener;
pub mod shutdown;
