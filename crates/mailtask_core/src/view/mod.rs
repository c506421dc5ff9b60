//! Dashboard view computations.
//!
//! # Responsibility
//! - Turn stored records into typed view models for rendering layers.
//! - Keep every computation pure over an injected reference day/time.
//!
//! # Invariants
//! - View functions never touch storage or the system clock.
//! - Percent offsets are clamped to the `[0, 100]` range before they leave
//!   this layer.

pub mod availability;
pub mod calendar;
pub mod dashboard;
pub mod gantt;
