//! `fd-report`: what a distribution run did, per restaurant and per driver.
//!
//! [`generate_report`] is a pure function over a post-assignment snapshot.
//! The result serialises (serde) to the external report shape and can be
//! written by any [`ReportWriter`]:
//!
//! | Writer             | Files created                      |
//! |--------------------|------------------------------------|
//! | `JsonReportWriter` | one JSON document at a given path  |
//! | `CsvReportWriter`  | `restaurants.csv`, `drivers.csv`   |
//!
//! # Usage
//!
//! ```rust,ignore
//! let before = orders_snapshot(&store.restaurants()?);
//! run_distribution(&store, &distributor)?;
//! let report = generate_report(&store.drivers()?, &store.restaurants()?, &before);
//! JsonReportWriter::new(Path::new("report.json"))?.write_report(&report)?;
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod report;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvReportWriter;
pub use error::{ReportError, ReportResult};
pub use json::JsonReportWriter;
pub use report::{DriverRow, FleetReport, Position, RestaurantRow, generate_report, orders_snapshot};
pub use writer::ReportWriter;
