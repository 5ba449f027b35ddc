// Main library entry point for typescope.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
