//! Foundation types shared by the rest of the crate.
//!
//! This module has no dependency on [`model`](crate::model) or
//! [`graph`](crate::graph): it only deals in names and errors.

pub mod error;
pub mod intern;

pub use error::{AnalysisError, IngestError};
pub use intern::{Interner, Name};
