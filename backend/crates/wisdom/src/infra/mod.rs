//! Infrastructure Layer

pub mod embedded;
