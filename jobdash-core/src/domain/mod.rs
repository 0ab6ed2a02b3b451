//! Core domain types
//!
//! These types are shared between the server (which persists them) and the
//! client/CLI (which display them).

pub mod job;
