//! Unit tests for the task module.

mod store_service_tests;
