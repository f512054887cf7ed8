//! Core error types

use thiserror::Error;

/// Errors produced by the transform module
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    /// The matrix has a zero (or numerically negligible) determinant
    #[error("Singular matrix: determinant {determinant} cannot be inverted")]
    SingularMatrix {
        /// Determinant of the offending matrix
        determinant: f64,
    },
}

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;
