// Image loader - decodes a file on disk into an immutable, shareable image
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use image::ImageReader;

use crate::error::LoadError;

/// Shared handle to a decoded image.
///
/// Cloning is cheap; every reader sees the same frozen pixels.
pub type ImageHandle = Arc<DecodedImage>;

/// A decoded RGBA8 image, frozen after construction
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
}

impl DecodedImage {
    /// Build an image from raw RGBA8 data.
    ///
    /// Returns None if `pixels` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if pixels.len() != expected {
            return None;
        }

        Some(Self {
            width,
            height,
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// Freeze the image into a shareable handle
    pub fn into_handle(self) -> ImageHandle {
        Arc::new(self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major RGBA8 pixel data
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Size of the pixel buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Turns a path into a decoded image.
///
/// Implementations must be callable from several threads at once; preload
/// windows are decoded in parallel.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<ImageHandle, LoadError>;
}

/// Loader backed by the `image` crate.
///
/// The format is sniffed from the file contents, so a misnamed extension
/// still decodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageLoader;

impl FileImageLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Result<ImageHandle, LoadError> {
        let not_found = |source: io::Error| LoadError::NotFound {
            path: path.to_path_buf(),
            source,
        };

        // Directories open fine on some platforms; reject them up front
        let metadata = fs::metadata(path).map_err(not_found)?;
        if !metadata.is_file() {
            return Err(not_found(io::Error::new(
                io::ErrorKind::NotFound,
                "not a regular file",
            )));
        }

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(not_found)?;

        let decoded = reader.decode().map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(DecodedImage {
            width,
            height,
            pixels: rgba.into_raw().into_boxed_slice(),
        }
        .into_handle())
    }
}
