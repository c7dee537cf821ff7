//! # CLI Module
//!
//! This module provides the command-line interface layer for brewscout. It turns
//! user input into a lookup, drives the [`crate::management::ShopFinder`] and
//! presents the result on the console.
//!
//! ## Commands
//!
//! - [`nearest`] - Finds the coffee shops closest to a coordinate
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (ShopFinder)
//!     ↓
//! API Layer (token, shop list, retries)
//!     ↓
//! Network Layer (bounded HTTP requests)
//! ```
//!
//! The layers below never print or exit; they return a
//! [`crate::error::FinderError`]. This layer decides what the user sees and
//! terminates the process on unrecoverable failures.
//!
//! ## Output
//!
//! - Progress and results go to standard output
//! - Errors go to standard error, followed by exit status 1
//! - Diagnostic logs go to standard error, filtered by `RUST_LOG`
//!
//! ## Usage Patterns
//!
//! ```bash
//! brewscout 47.6 -122.4            # plain `name, distance` lines
//! brewscout 47.6 -122.4 --table    # tabular output
//! RUST_LOG=brewscout=debug brewscout 47.6 -122.4
//! ```

mod nearest;

pub use nearest::nearest;
