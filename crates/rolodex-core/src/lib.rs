//! Core types and logic for the Rolodex contact book.
//!
//! This crate is deliberately free of file I/O. Storage lives behind
//! [`store::PersistenceGateway`]; the CLI and the filesystem backend depend on
//! this crate, not the other way round.

pub mod config;
pub mod contact;
pub mod dedupe;
pub mod error;
pub mod query;
pub mod similarity;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
