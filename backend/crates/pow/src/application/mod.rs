//! Application Layer - Use Cases
//!
//! This layer drives the domain services over a live connection.

pub mod config;
pub mod issue_challenge;
pub mod submit_solution;
