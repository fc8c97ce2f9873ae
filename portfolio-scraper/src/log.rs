use std::path::Path;

/// Outcome of one processed entry.
#[derive(Debug, Clone)]
pub enum ReportEntry {
    Success {
        name: String,
        image_url: String,
        local_image: String,
    },
    NoImage {
        name: String,
    },
    Error {
        name: String,
        message: String,
    },
}

/// Collects per-entry outcomes and writes a report file.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    entries: Vec<ReportEntry>,
}

impl ScrapeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry {
                ReportEntry::Success { .. } => summary.with_image += 1,
                ReportEntry::NoImage { .. } => summary.no_image += 1,
                ReportEntry::Error { .. } => summary.errors += 1,
            }
        }
        summary
    }

    /// Write the report to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Portfolio Scrape Report ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Images downloaded: {}", summary.with_image)?;
        writeln!(file, "No image found:    {}", summary.no_image)?;
        writeln!(file, "Errors:            {}", summary.errors)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                ReportEntry::Success {
                    name,
                    image_url,
                    local_image,
                } => {
                    writeln!(file, "[OK] {} -> {}", name, local_image)?;
                    writeln!(file, "     Source: {}", image_url)?;
                }
                ReportEntry::NoImage { name } => {
                    writeln!(file, "[NO IMAGE] {}", name)?;
                }
                ReportEntry::Error { name, message } => {
                    writeln!(file, "[ERROR] {}: {}", name, message)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ReportSummary {
    pub with_image: usize,
    pub no_image: usize,
    pub errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut report = ScrapeReport::new();
        report.add(ReportEntry::Success {
            name: "A".to_string(),
            image_url: "https://a.example/x.png".to_string(),
            local_image: "/portfolio-images/portfolio-1.jpg".to_string(),
        });
        report.add(ReportEntry::NoImage {
            name: "B".to_string(),
        });
        report.add(ReportEntry::Error {
            name: "C".to_string(),
            message: "connection refused".to_string(),
        });
        report.add(ReportEntry::NoImage {
            name: "D".to_string(),
        });

        let summary = report.summary();
        assert_eq!(summary.with_image, 1);
        assert_eq!(summary.no_image, 2);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_write_to_file() {
        let mut report = ScrapeReport::new();
        report.add(ReportEntry::Error {
            name: "A".to_string(),
            message: "HTTP 500".to_string(),
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        report.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Errors:            1"));
        assert!(text.contains("[ERROR] A: HTTP 500"));
    }
}
