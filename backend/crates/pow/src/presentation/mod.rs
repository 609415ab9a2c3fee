//! Presentation Layer
//!
//! Connection-facing side of the PoW gate.

pub mod middleware;
