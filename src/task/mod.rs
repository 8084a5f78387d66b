//! Per-user task lists for taskpad.
//!
//! A [`services::TaskStore`] binds one user and one category to the path
//! `<uid>/tasks/<category>`, mirrors the children observed there into an
//! ordered list, and writes adds and removes through to the backing store.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
