//! CSV report backend.
//!
//! Creates two files in the configured output directory:
//! - `restaurants.csv`
//! - `drivers.csv`
//!
//! The fleet average is not a row of either table; it is logged on
//! [`finish`](ReportWriter::finish) instead.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::info;

use crate::report::NONE_TITLE;
use crate::writer::ReportWriter;
use crate::{FleetReport, ReportResult};

/// Writes a report as two CSV tables.
pub struct CsvReportWriter {
    restaurants: Writer<File>,
    drivers:     Writer<File>,
    average:     Option<f64>,
    finished:    bool,
}

impl CsvReportWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> ReportResult<Self> {
        let mut restaurants = Writer::from_path(dir.join("restaurants.csv"))?;
        restaurants.write_record(["restaurant_id", "title", "orders_before", "orders_after"])?;

        let mut drivers = Writer::from_path(dir.join("drivers.csv"))?;
        drivers.write_record([
            "id",
            "name",
            "lat",
            "lng",
            "assigned_restaurant",
            "assigned_distance_km",
            "nearest_restaurant",
            "nearest_distance_km",
        ])?;

        Ok(Self { restaurants, drivers, average: None, finished: false })
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_report(&mut self, report: &FleetReport) -> ReportResult<()> {
        for row in &report.restaurants {
            self.restaurants.write_record(&[
                row.restaurant_id.to_string(),
                row.title.clone(),
                row.orders_before.to_string(),
                row.orders_after.to_string(),
            ])?;
        }
        for row in &report.drivers {
            self.drivers.write_record(&[
                row.id.to_string(),
                row.name.clone(),
                row.position.lat.to_string(),
                row.position.lng.to_string(),
                row.assigned_restaurant.as_deref().unwrap_or(NONE_TITLE).to_owned(),
                row.assigned_distance_km.to_string(),
                row.nearest_restaurant.as_deref().unwrap_or(NONE_TITLE).to_owned(),
                row.nearest_distance_km.to_string(),
            ])?;
        }
        self.average = Some(report.average_distance_km);
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.restaurants.flush()?;
        self.drivers.flush()?;
        if let Some(avg) = self.average {
            info!("CSV report written; average assigned distance {avg} km");
        }
        Ok(())
    }
}
