//! Full-text search over tasks.
//!
//! # Responsibility
//! - Expose keyword search across task titles and descriptions.
//!
//! # Invariants
//! - Search reads the FTS index maintained by storage triggers; it never
//!   mutates task rows.

pub mod fts;
