// Preload window planning around the focused entry
use std::path::Path;

use crate::scanner::FileEntry;

/// Upper bound on how many images either side of the focus are preloaded
pub const MAX_PRELOAD_RADIUS: usize = 5;

/// Images loaded either side of the focus for a given capacity
pub fn preload_radius(capacity: usize) -> usize {
    MAX_PRELOAD_RADIUS.min(capacity / 2)
}

/// Image entries within the preload radius of `focus_index`, in list order.
///
/// `focus_index` indexes the full list. Non-image entries are dropped and
/// the focus is moved to the first image at or after it (clamped to the
/// last image).
pub fn image_window(entries: &[FileEntry], focus_index: usize, capacity: usize) -> Vec<&FileEntry> {
    let images: Vec<&FileEntry> = entries.iter().filter(|e| e.is_image()).collect();
    if images.is_empty() {
        return Vec::new();
    }

    let before_focus = entries
        .iter()
        .take(focus_index)
        .filter(|e| e.is_image())
        .count();
    let focus = before_focus.min(images.len() - 1);

    let radius = preload_radius(capacity);
    let start = focus.saturating_sub(radius);
    let end = (focus + radius).min(images.len() - 1);

    images[start..=end].to_vec()
}

/// Entries in the preload window that are not yet resident
pub fn plan<'a>(
    entries: &'a [FileEntry],
    focus_index: usize,
    capacity: usize,
    is_resident: impl Fn(&Path) -> bool,
) -> Vec<&'a FileEntry> {
    image_window(entries, focus_index, capacity)
        .into_iter()
        .filter(|entry| !is_resident(&entry.path))
        .collect()
}

/// The focused entry, if it is an image that still needs loading
pub fn current<'a>(
    entries: &'a [FileEntry],
    focus_index: usize,
    is_resident: impl Fn(&Path) -> bool,
) -> Option<&'a FileEntry> {
    entries
        .get(focus_index)
        .filter(|entry| entry.is_image() && !is_resident(&entry.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileKind;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn images(count: usize) -> Vec<FileEntry> {
        (0..count)
            .map(|i| FileEntry::with_kind(format!("img{i:02}.png"), FileKind::Image))
            .collect()
    }

    fn names(planned: &[&FileEntry]) -> Vec<String> {
        planned.iter().map(|e| e.path.display().to_string()).collect()
    }

    fn nothing_resident(_: &Path) -> bool {
        false
    }

    #[test]
    fn radius_is_capped_by_half_capacity() {
        assert_eq!(preload_radius(50), 5);
        assert_eq!(preload_radius(10), 5);
        assert_eq!(preload_radius(7), 3);
        assert_eq!(preload_radius(1), 0);
    }

    #[test]
    fn twelve_images_focus_six_capacity_ten() {
        let entries = images(12);
        let planned = plan(&entries, 6, 10, nothing_resident);

        let expected: Vec<String> = (1..=11).map(|i| format!("img{i:02}.png")).collect();
        assert_eq!(names(&planned), expected);
    }

    #[test]
    fn window_is_clipped_at_list_edges() {
        let entries = images(4);
        assert_eq!(plan(&entries, 0, 50, nothing_resident).len(), 4);
        assert_eq!(plan(&entries, 3, 50, nothing_resident).len(), 4);

        let entries = images(20);
        let planned = plan(&entries, 1, 50, nothing_resident);
        assert_eq!(planned.first().unwrap().path, PathBuf::from("img00.png"));
        assert_eq!(planned.last().unwrap().path, PathBuf::from("img06.png"));
    }

    #[test]
    fn resident_paths_are_skipped() {
        let entries = images(12);
        let resident: HashSet<PathBuf> = ["img05.png", "img06.png"].iter().map(PathBuf::from).collect();

        let planned = plan(&entries, 6, 10, |path| resident.contains(path));
        assert_eq!(planned.len(), 9);
        assert!(planned.iter().all(|e| !resident.contains(&e.path)));
    }

    #[test]
    fn non_images_are_filtered_and_focus_translated() {
        let entries = vec![
            FileEntry::with_kind("folder", FileKind::Directory),
            FileEntry::with_kind("a.png", FileKind::Image),
            FileEntry::with_kind("notes.txt", FileKind::Other),
            FileEntry::with_kind("b.png", FileKind::Image),
            FileEntry::with_kind("c.png", FileKind::Image),
            FileEntry::with_kind("d.png", FileKind::Image),
        ];

        // capacity 2 gives radius 1 around b.png
        let planned = plan(&entries, 3, 2, nothing_resident);
        assert_eq!(names(&planned), vec!["a.png", "b.png", "c.png"]);

        // focusing the text file centres on the next image
        let planned = plan(&entries, 2, 2, nothing_resident);
        assert_eq!(names(&planned), vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn focus_past_end_clamps_to_last_image() {
        let entries = images(3);
        let planned = plan(&entries, 99, 2, nothing_resident);
        assert_eq!(names(&planned), vec!["img01.png", "img02.png"]);
    }

    #[test]
    fn no_images_plans_nothing() {
        let entries = vec![
            FileEntry::with_kind("folder", FileKind::Directory),
            FileEntry::with_kind("notes.txt", FileKind::Other),
        ];
        assert!(plan(&entries, 0, 10, nothing_resident).is_empty());
        assert!(plan(&[], 0, 10, nothing_resident).is_empty());
    }

    #[test]
    fn capacity_one_plans_only_focus() {
        let entries = images(5);
        let planned = plan(&entries, 2, 1, nothing_resident);
        assert_eq!(names(&planned), vec!["img02.png"]);
    }

    #[test]
    fn current_skips_non_images_and_resident() {
        let entries = vec![
            FileEntry::with_kind("notes.txt", FileKind::Other),
            FileEntry::with_kind("a.png", FileKind::Image),
        ];
        assert!(current(&entries, 0, nothing_resident).is_none());
        assert!(current(&entries, 5, nothing_resident).is_none());
        assert_eq!(
            current(&entries, 1, nothing_resident).map(|e| e.path.clone()),
            Some(PathBuf::from("a.png"))
        );
        assert!(current(&entries, 1, |_| true).is_none());
    }
}
