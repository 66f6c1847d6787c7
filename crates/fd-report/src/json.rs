//! JSON report backend: one pretty-printed document per report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::writer::ReportWriter;
use crate::{FleetReport, ReportResult};

/// Writes each report as a JSON document to a single file.
pub struct JsonReportWriter {
    out:      BufWriter<File>,
    finished: bool,
}

impl JsonReportWriter {
    /// Create (or truncate) the file at `path`.
    pub fn new(path: &Path) -> ReportResult<Self> {
        let out = BufWriter::new(File::create(path)?);
        Ok(Self { out, finished: false })
    }
}

impl ReportWriter for JsonReportWriter {
    fn write_report(&mut self, report: &FleetReport) -> ReportResult<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
