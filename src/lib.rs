//! Taskpad: a personal to-do list synchronized with a realtime store.
//!
//! Users authenticate through a session gateway, then add and complete
//! tasks that are mirrored from a hierarchical key-value store in real time.
//!
//! # Architecture
//!
//! Taskpad follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the auth service and the store
//! - **Adapters**: Concrete implementations of ports (in-memory for now)
//!
//! # Modules
//!
//! - [`session`]: Login, logout, registration and session notifications
//! - [`task`]: Per-user task lists kept in sync with the backing store
//! - [`view`]: Controller binding the session to the displayed task list
//! - [`config`]: Configuration loading and validation
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod session;
pub mod task;
pub mod telemetry;
pub mod view;
