use thiserror::Error;

/// Recoverable detection failures.
///
/// None of these are fatal to the host: the caller treats any of them as
/// "no detection this tick" and retries on the next one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DetectError {
    /// Zero width, zero height, or an empty pixel buffer.
    #[error("No image data available")]
    EmptyFrame,
    /// Every pixel is at or below the intensity floor (camera not delivering).
    #[error("No video content detected")]
    NoContent,
    /// A sample point fell outside the pixel buffer.
    #[error("pixel access failed at byte {index} (buffer holds {len} bytes)")]
    PixelAccessFailure { index: usize, len: usize },
}
