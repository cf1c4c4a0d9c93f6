//! Filesystem search over the service root
//!
//! Walks the service root with `walkdir` and evaluates a caller-supplied
//! predicate against each regular file's name (never its full path).
//! Results come back in directory-walk order, which is not stable across
//! filesystem states, so callers must not assume any ordering.

use std::path::Path;

use walkdir::WalkDir;

use crate::constants::MAX_LISTED_MATCHES;

/// One matched file, annotated with its size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// File name (not the full path)
    pub name: String,
    /// File size in bytes
    pub size: u64,
}

/// Outcome of a search: the full match count plus the first few matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    /// Total number of files whose name matched the predicate
    pub total: usize,
    /// The first matches encountered, capped at [`MAX_LISTED_MATCHES`]
    pub entries: Vec<SearchResult>,
}

/// Find all regular files under `root` whose name matches the predicate
///
/// Entries that cannot be read (permission errors, races with deletion)
/// are skipped rather than failing the whole search. Directories are
/// traversed but never matched themselves.
pub fn find_files<P>(root: &Path, matches: P) -> SearchSummary
where
    P: Fn(&str) -> bool,
{
    let mut total = 0;
    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !matches(name) {
            continue;
        }
        total += 1;
        if entries.len() < MAX_LISTED_MATCHES {
            // Size comes from the walk entry itself so nested matches are
            // annotated correctly.
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(SearchResult {
                name: name.to_string(),
                size,
            });
        }
    }

    SearchSummary { total, entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_root(files: &[(&str, usize)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (path, size) in files {
            let full = temp_dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, vec![b'x'; *size]).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_empty_root() {
        let root = TempDir::new().unwrap();
        let summary = find_files(root.path(), |_| true);
        assert_eq!(summary.total, 0);
        assert!(summary.entries.is_empty());
    }

    #[test]
    fn test_substring_match_with_sizes() {
        let root = make_root(&[("report.pdf", 100), ("notes.txt", 5), ("other.doc", 9)]);
        let summary = find_files(root.path(), |name| name.contains("report"));
        assert_eq!(summary.total, 1);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].name, "report.pdf");
        assert_eq!(summary.entries[0].size, 100);
    }

    #[test]
    fn test_nested_files_matched_by_name_only() {
        let root = make_root(&[("music/jazz/tune.mp3", 64), ("tune.mp3", 32)]);
        let summary = find_files(root.path(), |name| name == "tune.mp3");
        assert_eq!(summary.total, 2);
        // Sizes must belong to the actual files, not a root-joined guess
        let mut sizes: Vec<u64> = summary.entries.iter().map(|e| e.size).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![32, 64]);
    }

    #[test]
    fn test_directories_never_match() {
        let root = make_root(&[("match-me/inner.txt", 1)]);
        let summary = find_files(root.path(), |name| name.contains("match-me"));
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_case_sensitive_predicate() {
        let root = make_root(&[("Report.PDF", 10)]);
        assert_eq!(find_files(root.path(), |n| n.contains("report")).total, 0);
        assert_eq!(find_files(root.path(), |n| n.contains("Report")).total, 1);
    }

    #[test]
    fn test_listed_entries_capped() {
        let files: Vec<(String, usize)> = (0..12).map(|i| (format!("file{i}.txt"), i)).collect();
        let refs: Vec<(&str, usize)> = files.iter().map(|(n, s)| (n.as_str(), *s)).collect();
        let root = make_root(&refs);

        let summary = find_files(root.path(), |name| name.starts_with("file"));
        assert_eq!(summary.total, 12);
        assert_eq!(summary.entries.len(), MAX_LISTED_MATCHES);
    }

    #[test]
    fn test_count_matches_predicate_exactly() {
        let root = make_root(&[
            ("a.mp3", 1),
            ("b.mp3", 2),
            ("c.txt", 3),
            ("deep/d.mp3", 4),
        ]);
        let summary = find_files(root.path(), |name| name.ends_with(".mp3"));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.entries.len(), 3);
    }
}
