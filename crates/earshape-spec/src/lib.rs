//! Earshape Audiogram Library
//!
//! This crate provides the audiogram data model used by the earshape
//! correction pipeline: per-ear `[frequency_hz, loss_db]` tables, JSON
//! loading, and validation with coded, path-annotated errors.
//!
//! # Example
//!
//! ```
//! use earshape_spec::{Audiogram, Ear};
//!
//! let audiogram = Audiogram::from_json(
//!     "[[[1000, 10], [100, 0], [5000, 20]], [[100, 0], [1000, 10], [5000, 20]]]",
//! )
//! .unwrap();
//!
//! // Points come back sorted by frequency
//! assert_eq!(audiogram.points(Ear::Left)[0].frequency_hz, 100.0);
//! ```
//!
//! # Modules
//!
//! - [`audiogram`]: Audiogram, point and ear types
//! - [`error`]: Error codes and validation errors
//! - [`validation`]: JSON walking and per-ear checks

pub mod audiogram;
pub mod error;
pub mod validation;

pub use audiogram::{Audiogram, AudiogramPoint, Ear, MIN_POINTS};
pub use error::{AudiogramError, ErrorCode, SpecResult, ValidationError};
