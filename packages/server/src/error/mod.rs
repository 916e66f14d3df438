//! Centralized error handling for the filter and its Matrix-facing endpoints

pub mod filter_errors;
pub mod matrix_errors;

pub use filter_errors::FilterError;
pub use matrix_errors::MatrixError;
