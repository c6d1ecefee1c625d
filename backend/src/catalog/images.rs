//! Image folder index
//!
//! Images are matched to rows purely by filename: a file belongs to a row when
//! its name contains both the accession text and the cultivar's filename stem.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Sorted snapshot of the filenames in an image folder
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    filenames: Vec<String>,
}

impl ImageIndex {
    /// List regular files directly inside `dir` (no recursion)
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut filenames = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => filenames.push(name),
                Err(name) => debug!(?name, "Skipping image with non UTF-8 filename"),
            }
        }

        Ok(Self::from_filenames(filenames))
    }

    pub fn from_filenames<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filenames: Vec<String> = filenames.into_iter().map(Into::into).collect();
        // Directory order is platform dependent; sort so the first match is stable.
        filenames.sort();
        Self { filenames }
    }

    /// First filename, in lexicographic order, containing both substrings
    pub fn find(&self, accession: &str, cultivar_stem: &str) -> Option<&str> {
        self.filenames
            .iter()
            .find(|name| name.contains(accession) && name.contains(cultivar_stem))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123", "Gala_Apple", Some("Gala_Apple_123.jpg"))]
    #[case("456", "Fuji", Some("456-Fuji.png"))]
    #[case("123", "Fuji", None)]
    #[case("999", "Gala_Apple", None)]
    fn test_requires_both_substrings(
        #[case] accession: &str,
        #[case] stem: &str,
        #[case] expected: Option<&str>,
    ) {
        let index = ImageIndex::from_filenames(["Gala_Apple_123.jpg", "456-Fuji.png"]);
        assert_eq!(index.find(accession, stem), expected);
    }

    #[test]
    fn test_first_match_is_lexicographic() {
        let index = ImageIndex::from_filenames(["Gala_7_b.jpg", "Gala_7_a.jpg", "Gala_7.jpg"]);
        assert_eq!(index.find("7", "Gala"), Some("Gala_7.jpg"));
    }

    #[test]
    fn test_scan_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gala_123.jpg"), b"").unwrap();
        fs::create_dir(dir.path().join("Gala_123_nested")).unwrap();
        fs::write(dir.path().join("Gala_123_nested").join("Gala_123_deep.jpg"), b"").unwrap();

        let index = ImageIndex::scan(dir.path()).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.find("123", "Gala"), Some("Gala_123.jpg"));
    }

    #[test]
    fn test_scan_missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageIndex::scan(&dir.path().join("absent")).is_err());
    }
}
