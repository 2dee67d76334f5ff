//! Test helper utilities

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread::sleep;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use thumbcache::{DecodedImage, FileEntry, FileKind, ImageHandle, ImageLoader, LoadError};

/// Loader that records every path it is asked for.
///
/// Paths containing "broken" fail with a decode-style error, paths
/// containing "missing" fail with NotFound; everything else yields a 1x1 image.
#[derive(Default)]
pub struct RecordingLoader {
    loaded: Mutex<Vec<PathBuf>>,
    calls: AtomicUsize,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of load calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Paths requested so far, sorted
    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.loaded.lock().unwrap().clone();
        paths.sort();
        paths
    }
}

impl ImageLoader for RecordingLoader {
    fn load(&self, path: &Path) -> Result<ImageHandle, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.loaded.lock().unwrap().push(path.to_path_buf());

        let name = path.to_string_lossy();
        if name.contains("missing") {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        if name.contains("broken") {
            return Err(LoadError::Decode {
                path: path.to_path_buf(),
                source: image::ImageError::Unsupported(
                    image::error::UnsupportedError::from_format_and_kind(
                        image::error::ImageFormatHint::Unknown,
                        image::error::UnsupportedErrorKind::GenericFeature(
                            "test fixture".to_string(),
                        ),
                    ),
                ),
            });
        }

        Ok(DecodedImage::from_rgba(1, 1, vec![255, 255, 255, 255])
            .expect("1x1 buffer")
            .into_handle())
    }
}

/// `count` image entries named img00.png, img01.png, ...
pub fn image_entries(count: usize) -> Vec<FileEntry> {
    (0..count)
        .map(|i| FileEntry::with_kind(image_name(i), FileKind::Image))
        .collect()
}

pub fn image_name(index: usize) -> String {
    format!("img{index:02}.png")
}

/// Write a small solid PNG into `dir`
pub fn write_png(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 100, 50, 255]))
        .save(&path)
        .expect("Failed to write test png");
    path
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10));
    }
    condition()
}
