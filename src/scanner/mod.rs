// Scanner module - file classification and directory listing for the browser pane
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Extensions the loader is expected to decode (lowercase, no dot)
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "ico", "tga", "pnm",
];

/// Directories never shown in a listing
const SKIP_DIRS: &[&str] = &["__MACOSX", ".Trash", ".Spotlight-V100", ".fseventsd"];

/// What a listed path is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Directory,
    Other,
}

/// Stable identifier for a listed entry.
///
/// Wraps the full path, so two distinct paths never share an ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(PathBuf);

impl EntryId {
    /// ID for a path; the same path always yields the same ID
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_path_buf())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One row of the ordered file list the viewer displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: EntryId,
    pub path: PathBuf,
    pub kind: FileKind,
}

impl FileEntry {
    /// Build an entry, classifying the path against the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = classify(&path);
        Self::with_kind(path, kind)
    }

    /// Build an entry with a known kind
    pub fn with_kind(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        let path = path.into();
        Self {
            id: EntryId::from_path(&path),
            path,
            kind,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == FileKind::Image
    }
}

/// Check whether a path has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Classify a path; directories are detected on disk, images by extension
pub fn classify(path: &Path) -> FileKind {
    if path.is_dir() {
        FileKind::Directory
    } else if is_image_file(path) {
        FileKind::Image
    } else {
        FileKind::Other
    }
}

/// List the immediate children of a directory.
///
/// Directories come first, then files, each group sorted by name ignoring
/// case. Hidden entries and known system directories are skipped.
pub fn scan_directory(dir: &Path) -> io::Result<Vec<FileEntry>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        ));
    }

    let mut entries: Vec<FileEntry> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            !(entry.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .map(|entry| {
            let kind = if entry.file_type().is_dir() {
                FileKind::Directory
            } else if is_image_file(entry.path()) {
                FileKind::Image
            } else {
                FileKind::Other
            };
            FileEntry::with_kind(entry.into_path(), kind)
        })
        .collect();

    entries.sort_by_cached_key(|entry| {
        let name = entry
            .path
            .file_name()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        (entry.kind != FileKind::Directory, name)
    });

    debug!(dir = %dir.display(), count = entries.len(), "scanned directory");
    Ok(entries)
}
