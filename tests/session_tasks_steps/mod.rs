//! Step definitions for task page scenarios.

mod given;
mod then;
mod when;
pub mod world;
