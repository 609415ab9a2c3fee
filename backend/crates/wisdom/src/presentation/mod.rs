//! Presentation Layer

pub mod handler;
