//! Error and diagnostic types for reading graph documents.
//!
//! A [`Diagnostic`] describes one problem with a document: an error code, a
//! message, an optional source location and optional help text. A
//! [`SourceError`] carries every diagnostic found while reading one document.

mod diagnostic;
mod error_code;
mod source_error;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use source_error::SourceError;
