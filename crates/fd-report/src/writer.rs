//! The `ReportWriter` trait implemented by all report backends.

use crate::{FleetReport, ReportResult};

/// Trait implemented by the JSON and CSV writers.
pub trait ReportWriter {
    /// Write one complete report.
    fn write_report(&mut self, report: &FleetReport) -> ReportResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> ReportResult<()>;
}
