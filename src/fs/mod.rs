//! File system operations with transaction support.
//!
//! Manifest rewrites are staged in a [`Transaction`] and committed with
//! [`atomic::write_atomic`].

pub mod atomic;
pub mod transaction;

pub use transaction::Transaction;
