//! Error types for the patch-fill crate.

use crate::rect::Rect;

/// Errors that can occur while resolving regions, filling them, or writing results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A region is degenerate (too small after normalization) or cannot be resolved.
    #[error("invalid region: {reason}")]
    InvalidRegion {
        /// Why the region was rejected.
        reason: String,
    },

    /// No usable region was supplied.
    #[error("no regions to fill")]
    NoRegions,

    /// Fill parameters are outside their allowed ranges.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The pixel buffer cannot be used as a drawing surface.
    #[error("pixel buffer unavailable ({width}x{height})")]
    SurfaceUnavailable {
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
    },

    /// A rectangle does not fit inside the buffer it addresses.
    #[error("rectangle {rect} outside {width}x{height} buffer")]
    RegionOutOfBounds {
        /// The offending rectangle.
        rect: Rect,
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
    },

    /// A fill run was resumed after it had already failed.
    #[error("fill aborted after failure in pass {pass}")]
    Aborted {
        /// The pass that failed.
        pass: u8,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A regions file is not valid JSON or does not match the expected shape.
    #[cfg(feature = "cli")]
    #[error("invalid regions file: {0}")]
    RegionFile(#[from] serde_json::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let surface = Error::SurfaceUnavailable {
            width: 0,
            height: 20,
        };
        assert!(surface.to_string().contains("0x20"));

        let oob = Error::RegionOutOfBounds {
            rect: Rect::new(90, 90, 20, 20),
            width: 100,
            height: 100,
        };
        let msg = oob.to_string();
        assert!(msg.contains("20x20+90+90"));
        assert!(msg.contains("100x100"));
    }

    #[test]
    fn invalid_region_carries_reason() {
        let err = Error::InvalidRegion {
            reason: "3x40 is below the 6px minimum".to_string(),
        };
        assert!(err.to_string().contains("6px minimum"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn bad_region_file_converts_from_serde_json() {
        fn parse(text: &str) -> Result<Vec<crate::rect::Region>> {
            Ok(serde_json::from_str(text)?)
        }

        let err = parse("[{\"pixels\": [1, 2]}]").unwrap_err();
        assert!(matches!(err, Error::RegionFile(_)));
        assert!(err.to_string().starts_with("invalid regions file:"));
        assert!(parse("[]").unwrap().is_empty());
    }
}
