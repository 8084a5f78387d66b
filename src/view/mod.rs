//! View controller for the task page.

mod controller;

pub use controller::{LoginForm, TaskViewController, ViewError, ViewResult, ViewState};

#[cfg(test)]
mod tests;
