use thiserror::Error;

/// Errors from [`crate::matrix::DistanceMatrixProvider::get_distance_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No locations were provided.
    ///
    /// Callers should short-circuit before requesting an empty matrix.
    #[error("at least one location is required")]
    EmptyInput,
    /// The routing service could not be reached.
    #[error("request to {url} failed: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The routing service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("request to {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The routing service answered with a non-`Ok` response code.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service response code, e.g. `InvalidQuery`.
        code: String,
        /// Service-supplied message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
    /// The returned matrix does not match the requested locations.
    #[error("expected a {expected}x{expected} matrix: {detail}")]
    DimensionMismatch {
        /// Number of requested locations.
        expected: usize,
        /// Which row or table was malformed.
        detail: String,
    },
}
