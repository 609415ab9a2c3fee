//! Application Layer - Use Cases

pub mod service;
