//! # pp-core
//!
//! Core error and shared types for popprior.
//!
//! Every other crate in the workspace reports failures through [`Error`] and describes
//! supports and 2D draws with the plain types in [`types`].

#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{JointSamples, Support};
