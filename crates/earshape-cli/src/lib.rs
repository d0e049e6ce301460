//! Earshape CLI library.
//!
//! This crate provides the core functionality for the `earshape` binary:
//! the correction command, media adapters, WAV I/O, and diagnostic rendering.

pub mod commands;
pub mod media;
pub mod prompt;
pub mod render;
pub mod report;
pub mod wav;
