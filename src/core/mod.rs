//! Core application primitives (HTTP surface, scan scheduler)

pub mod http;
pub mod scheduler;

pub use http::*;
pub use scheduler::*;
