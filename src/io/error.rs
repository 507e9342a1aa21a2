//! Error types for stack assembly operations

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Main error type for all stack building operations
///
/// Nothing is retried or recovered locally; every variant aborts the whole
/// run when it reaches the entry point.
#[derive(Debug)]
pub enum StackError {
    /// A trial name token had no range token following it
    UnpairedTrialName {
        /// The trailing name token
        name: String,
    },

    /// A range token was not of the form `start:end`
    MalformedRange {
        /// The offending range token
        token: String,
    },

    /// A range bound could not be parsed as an unsigned integer
    InvalidRangeBound {
        /// The offending range token
        token: String,
        /// Underlying integer parsing error
        source: ParseIntError,
    },

    /// Failed to read the input directory
    DirectoryRead {
        /// Directory that was being listed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to create the output directory
    ///
    /// An already existing directory is not an error and never reaches
    /// this variant.
    DirectoryCreate {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to decode an input frame file
    FrameDecode {
        /// Path to the frame file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// A frame or stack page uses a pixel format the stacker cannot carry
    UnsupportedPixelFormat {
        /// Path to the offending file
        path: PathBuf,
        /// Description of the encountered pixel format
        format: String,
    },

    /// A frame sequence cannot be assembled into one stack
    ///
    /// Raised for empty selections and for sequences mixing bit depths or
    /// plane dimensions.
    InvalidFrameData {
        /// Description of what is wrong with the sequence
        reason: String,
    },

    /// Failed to encode or write an output stack
    StackEncode {
        /// Path where the write was attempted
        path: PathBuf,
        /// Underlying TIFF encoding error
        source: tiff::TiffError,
    },

    /// Failed to read a stack file back into frames
    StackDecode {
        /// Path to the stack file
        path: PathBuf,
        /// Underlying TIFF decoding error
        source: tiff::TiffError,
    },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnpairedTrialName { name } => {
                write!(f, "Trial name '{name}' has no range token after it")
            }
            Self::MalformedRange { token } => {
                write!(f, "Range token '{token}' is not of the form start:end")
            }
            Self::InvalidRangeBound { token, source } => {
                write!(f, "Range token '{token}' has a non-integer bound: {source}")
            }
            Self::DirectoryRead { path, source } => {
                write!(
                    f,
                    "Failed to read input directory '{}': {source}",
                    path.display()
                )
            }
            Self::DirectoryCreate { path, source } => {
                write!(
                    f,
                    "Failed to create output directory '{}': {source}",
                    path.display()
                )
            }
            Self::FrameDecode { path, source } => {
                write!(f, "Failed to decode frame '{}': {source}", path.display())
            }
            Self::UnsupportedPixelFormat { path, format } => {
                write!(
                    f,
                    "Unsupported pixel format {format} in '{}' (grayscale frames expected)",
                    path.display()
                )
            }
            Self::InvalidFrameData { reason } => {
                write!(f, "Invalid frame sequence: {reason}")
            }
            Self::StackEncode { path, source } => {
                write!(f, "Failed to write stack to '{}': {source}", path.display())
            }
            Self::StackDecode { path, source } => {
                write!(f, "Failed to read stack '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRangeBound { source, .. } => Some(source),
            Self::DirectoryRead { source, .. } | Self::DirectoryCreate { source, .. } => {
                Some(source)
            }
            Self::FrameDecode { source, .. } => Some(source),
            Self::StackEncode { source, .. } | Self::StackDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for stack building results
pub type Result<T> = std::result::Result<T, StackError>;
