//! TIFF frame decoding and multi-page stack encoding
//!
//! Input frames are decoded one file per 2-D plane through the `image`
//! crate; assembled stacks are written as one multi-page TIFF (one image
//! file directory per frame) through the `tiff` crate, which also reads
//! stacks back for verification.

use crate::io::error::{Result, StackError};
use crate::stack::frames::{Frame, FrameStack};
use ndarray::{Array2, Axis};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{TiffEncoder, colortype};

/// Decode one frame file into a 2-D grayscale plane
///
/// The source bit depth is preserved; 8-bit and 16-bit grayscale frames
/// are supported.
///
/// # Errors
///
/// Returns an error if the file cannot be decoded or does not hold
/// grayscale pixel data.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let decoded = image::open(path).map_err(|source| StackError::FrameDecode {
        path: path.to_path_buf(),
        source,
    })?;

    match decoded {
        image::DynamicImage::ImageLuma8(buffer) => {
            let (rows, cols) = (buffer.height() as usize, buffer.width() as usize);
            into_plane(path, rows, cols, buffer.into_raw()).map(Frame::Gray8)
        }
        image::DynamicImage::ImageLuma16(buffer) => {
            let (rows, cols) = (buffer.height() as usize, buffer.width() as usize);
            into_plane(path, rows, cols, buffer.into_raw()).map(Frame::Gray16)
        }
        other => Err(StackError::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            format: format!("{:?}", other.color()),
        }),
    }
}

/// Decode many frame files, preserving the input order
///
/// # Errors
///
/// Propagates the first decoding failure; later files are not touched.
pub fn load_frames(paths: &[std::path::PathBuf]) -> Result<Vec<Frame>> {
    paths.iter().map(|path| load_frame(path)).collect()
}

/// Write a stack as one multi-page TIFF, one page per frame
///
/// An existing file at `path` is overwritten without warning.
///
/// # Errors
///
/// Returns [`StackError::StackEncode`] if the file cannot be created or a
/// page cannot be encoded.
pub fn write_stack(path: &Path, stack: &FrameStack) -> Result<()> {
    let file = File::create(path).map_err(|source| StackError::StackEncode {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    let mut encoder =
        TiffEncoder::new(BufWriter::new(file)).map_err(|source| StackError::StackEncode {
            path: path.to_path_buf(),
            source,
        })?;

    let (rows, cols) = stack.frame_dimensions();
    match stack {
        FrameStack::Gray8(data) => {
            for page in data.axis_iter(Axis(0)) {
                let page = page.as_standard_layout();
                let pixels = page.as_slice().ok_or_else(|| non_contiguous_page(path))?;
                encoder
                    .write_image::<colortype::Gray8>(cols as u32, rows as u32, pixels)
                    .map_err(|source| StackError::StackEncode {
                        path: path.to_path_buf(),
                        source,
                    })?;
            }
        }
        FrameStack::Gray16(data) => {
            for page in data.axis_iter(Axis(0)) {
                let page = page.as_standard_layout();
                let pixels = page.as_slice().ok_or_else(|| non_contiguous_page(path))?;
                encoder
                    .write_image::<colortype::Gray16>(cols as u32, rows as u32, pixels)
                    .map_err(|source| StackError::StackEncode {
                        path: path.to_path_buf(),
                        source,
                    })?;
            }
        }
    }

    Ok(())
}

/// Read a multi-page TIFF stack back into frames
///
/// # Errors
///
/// Returns an error if the file cannot be decoded, holds non-grayscale
/// pages, or its pages do not form a homogeneous stack.
pub fn read_stack(path: &Path) -> Result<FrameStack> {
    let file = File::open(path).map_err(|source| StackError::StackDecode {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    let mut decoder =
        Decoder::new(BufReader::new(file)).map_err(|source| StackError::StackDecode {
            path: path.to_path_buf(),
            source,
        })?;

    let mut frames = Vec::new();
    loop {
        frames.push(read_page(&mut decoder, path)?);
        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|source| StackError::StackDecode {
                path: path.to_path_buf(),
                source,
            })?;
    }

    FrameStack::from_frames(&frames)
}

fn read_page(decoder: &mut Decoder<BufReader<File>>, path: &Path) -> Result<Frame> {
    let stack_decode = |source| StackError::StackDecode {
        path: path.to_path_buf(),
        source,
    };

    let color_type = decoder.colortype().map_err(stack_decode)?;
    let (width, height) = decoder.dimensions().map_err(stack_decode)?;
    let pixels = decoder.read_image().map_err(stack_decode)?;

    match (color_type, pixels) {
        (ColorType::Gray(8), DecodingResult::U8(buffer)) => {
            into_plane(path, height as usize, width as usize, buffer).map(Frame::Gray8)
        }
        (ColorType::Gray(16), DecodingResult::U16(buffer)) => {
            into_plane(path, height as usize, width as usize, buffer).map(Frame::Gray16)
        }
        (other, _) => Err(StackError::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            format: format!("{other:?}"),
        }),
    }
}

fn into_plane<T>(path: &Path, rows: usize, cols: usize, buffer: Vec<T>) -> Result<Array2<T>> {
    Array2::from_shape_vec((rows, cols), buffer).map_err(|source| StackError::InvalidFrameData {
        reason: format!(
            "pixel buffer of '{}' does not match its {rows}x{cols} header: {source}",
            path.display()
        ),
    })
}

fn non_contiguous_page(path: &Path) -> StackError {
    StackError::InvalidFrameData {
        reason: format!(
            "stack page for '{}' is not contiguous in memory",
            path.display()
        ),
    }
}
