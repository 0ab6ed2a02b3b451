//! Data Transfer Objects
//!
//! Request and response shapes exchanged between the dashboard server and
//! its clients (HTTP client, CLI, HTML forms).

pub mod job;
