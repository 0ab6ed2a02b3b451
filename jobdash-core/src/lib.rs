//! Jobdash Core
//!
//! Core types and the job board for the Jobdash dashboard.
//!
//! This crate contains:
//! - Domain types: the job record and its status
//! - The job board: the in-memory store and view model (add, retry, list)
//! - Query types: filters and sort keys used to project the board
//! - DTOs: request/response shapes shared by the server, client and CLI

pub mod board;
pub mod domain;
pub mod dto;
pub mod error;
pub mod query;

pub use board::JobBoard;
pub use error::BoardError;
