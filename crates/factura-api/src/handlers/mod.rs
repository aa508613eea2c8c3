//! HTTP request handlers, one module per resource.

pub mod departments;
pub mod documents;
pub mod employees;
pub mod health;
pub mod processing;
