//! Grayscale frame planes and their assembly into multi-frame stacks
//!
//! Frames keep the bit depth of the source file. A stack is built from a
//! homogeneous frame sequence by stacking the planes along a new leading
//! axis, so frame `k` of the stack is the `k`-th selected file.

use crate::io::error::{Result, StackError};
use ndarray::{Array2, Array3, ArrayView2, Axis, stack};

/// One decoded 2-D grayscale image plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// 8-bit grayscale plane, indexed `(row, col)`
    Gray8(Array2<u8>),
    /// 16-bit grayscale plane, indexed `(row, col)`
    Gray16(Array2<u16>),
}

impl Frame {
    /// Plane dimensions as `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Gray8(plane) => plane.dim(),
            Self::Gray16(plane) => plane.dim(),
        }
    }

    /// Bits per pixel of the source data
    pub const fn bit_depth(&self) -> u8 {
        match self {
            Self::Gray8(_) => 8,
            Self::Gray16(_) => 16,
        }
    }
}

/// A multi-frame image, frames stacked along a new leading axis
///
/// Created transiently per trial and written to disk immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStack {
    /// 8-bit stack, indexed `(frame, row, col)`
    Gray8(Array3<u8>),
    /// 16-bit stack, indexed `(frame, row, col)`
    Gray16(Array3<u16>),
}

impl FrameStack {
    /// Assemble a stack from decoded frames, preserving their order
    ///
    /// # Errors
    ///
    /// Returns [`StackError::InvalidFrameData`] if the sequence is empty,
    /// mixes bit depths, or mixes plane dimensions.
    pub fn from_frames(frames: &[Frame]) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(StackError::InvalidFrameData {
                reason: "cannot stack an empty frame sequence".to_string(),
            });
        };

        let expected = first.dimensions();
        for frame in frames {
            if frame.bit_depth() != first.bit_depth() {
                return Err(StackError::InvalidFrameData {
                    reason: format!(
                        "mixed bit depths in one trial: {}-bit and {}-bit frames",
                        first.bit_depth(),
                        frame.bit_depth()
                    ),
                });
            }
            if frame.dimensions() != expected {
                return Err(StackError::InvalidFrameData {
                    reason: format!(
                        "mixed frame dimensions in one trial: {:?} and {:?}",
                        expected,
                        frame.dimensions()
                    ),
                });
            }
        }

        match first {
            Frame::Gray8(_) => {
                let planes = collect_planes(frames, |frame| match frame {
                    Frame::Gray8(plane) => Some(plane.view()),
                    Frame::Gray16(_) => None,
                })?;
                Ok(Self::Gray8(stack_planes(&planes)?))
            }
            Frame::Gray16(_) => {
                let planes = collect_planes(frames, |frame| match frame {
                    Frame::Gray16(plane) => Some(plane.view()),
                    Frame::Gray8(_) => None,
                })?;
                Ok(Self::Gray16(stack_planes(&planes)?))
            }
        }
    }

    /// Number of frames along the leading axis
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Gray8(data) => data.dim().0,
            Self::Gray16(data) => data.dim().0,
        }
    }

    /// Dimensions of every frame as `(rows, cols)`
    pub fn frame_dimensions(&self) -> (usize, usize) {
        match self {
            Self::Gray8(data) => (data.dim().1, data.dim().2),
            Self::Gray16(data) => (data.dim().1, data.dim().2),
        }
    }

    /// Bits per pixel of the stacked data
    pub const fn bit_depth(&self) -> u8 {
        match self {
            Self::Gray8(_) => 8,
            Self::Gray16(_) => 16,
        }
    }
}

// Bit depth homogeneity is validated before this runs; a leftover
// mismatch still surfaces as an error rather than a panic.
fn collect_planes<'a, T>(
    frames: &'a [Frame],
    as_plane: impl Fn(&'a Frame) -> Option<ArrayView2<'a, T>>,
) -> Result<Vec<ArrayView2<'a, T>>> {
    frames
        .iter()
        .map(|frame| {
            as_plane(frame).ok_or_else(|| StackError::InvalidFrameData {
                reason: "mixed bit depths in one trial".to_string(),
            })
        })
        .collect()
}

fn stack_planes<T: Clone>(planes: &[ArrayView2<'_, T>]) -> Result<Array3<T>> {
    stack(Axis(0), planes).map_err(|source| StackError::InvalidFrameData {
        reason: format!("frame planes do not stack: {source}"),
    })
}
