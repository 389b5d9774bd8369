use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use super::FeatureSink;
use crate::model::feature::FeatureRow;

/// Writes rows in table order with a header line. Unavailable values become
/// empty cells.
pub struct CsvFeatureSink<W: std::io::Write> {
    writer: csv::Writer<W>,
}

impl CsvFeatureSink<File> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self { writer })
    }
}

impl<W: std::io::Write> CsvFeatureSink<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))
    }
}

impl<W: std::io::Write> FeatureSink for CsvFeatureSink<W> {
    fn write_rows(&mut self, rows: &[FeatureRow]) -> Result<()> {
        for row in rows {
            self.writer
                .serialize(row)
                .with_context(|| format!("failed to write row for {}", row.date))?;
        }
        self.writer.flush().context("failed to flush feature rows")?;
        Ok(())
    }
}

pub fn rows_to_csv_string(rows: &[FeatureRow]) -> Result<String> {
    let mut sink = CsvFeatureSink::from_writer(vec![]);
    sink.write_rows(rows)?;
    let data = sink.into_inner()?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
