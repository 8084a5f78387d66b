//! Unit tests for the view controller.
