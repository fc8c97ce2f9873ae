//! Reading and writing the JSON portfolio dataset.

use std::path::Path;

use crate::error::DatasetError;
use crate::types::PortfolioEntry;

/// Read the full dataset. The file must hold a JSON array of entries.
pub fn read_entries(path: &Path) -> Result<Vec<PortfolioEntry>, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| DatasetError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the full dataset, pretty-printed, replacing any existing file.
pub fn write_entries(path: &Path, entries: &[PortfolioEntry]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| DatasetError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }
    let json = serde_json::to_string_pretty(entries).map_err(|e| DatasetError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolios.json");

        let entries = vec![PortfolioEntry {
            name: "A".to_string(),
            portfolio_url: "https://a.example/".to_string(),
            image_url: Some("https://a.example/hero.png".to_string()),
            local_image: Some("/portfolio-images/portfolio-1.jpg".to_string()),
            extra: serde_json::Map::new(),
        }];

        write_entries(&path, &entries).unwrap();
        let read_back = read_entries(&path).unwrap();
        assert_eq!(read_back, entries);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_entries(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_entries(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Json { .. }));
    }
}
