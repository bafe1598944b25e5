//! Screens taxi trip records for statistically anomalous trips and ranks the most frequent trip
//! attributes.
//!
//! The crate is built around two pure computations:
//!
//! - [`top_k`]: bounded selection of the `k` largest `(key, score)` pairs of a stream, backed by
//!   a hand-rolled binary min-heap that never holds more than `k` entries.
//! - [`detect_outliers`]: the sigma rule. Values further than `multiplier` population standard
//!   deviations from the mean are flagged.
//!
//! [`Analysis`] ties both to [`Trip`] records, and the `csv_input` feature (enabled by default)
//! reads those records from CSV files.
//!
//! ```
//! use trip_stats::{detect_outliers, top_k};
//!
//! let fares_per_km = [Some(2.38), Some(2.68), None, Some(15.0), Some(2.33), Some(2.5)];
//! let outliers = detect_outliers(&fares_per_km, |&v| v, 1.5);
//! assert_eq!(outliers, vec![&Some(15.0)]);
//!
//! let busiest = top_k(vec![("JFK", 120), ("LGA", 95), ("Midtown", 310)], 2);
//! assert_eq!(busiest, vec![("Midtown", 310), ("JFK", 120)]);
//! ```

#![warn(missing_docs)]
#![warn(bare_trait_objects)]

#[cfg(test)]
extern crate approx;
#[cfg(test)]
extern crate quickcheck;

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod analysis;
#[cfg(feature = "csv_input")]
pub mod csv_input;
mod error;
mod format;
mod report;
pub mod stats;
mod trip;

pub use crate::analysis::Analysis;
pub use crate::error::{log_error, Error, Result};
pub use crate::report::{OutlierSection, Ranking, Report, Summary};
#[cfg(feature = "rayon")]
pub use crate::stats::top_k::par_top_k;
pub use crate::stats::top_k::{most_frequent, top_k, BoundedTopK};
pub use crate::stats::univariate::outliers::sigma::{
    detect_outliers, scan, Detection, Label, Thresholds, DEFAULT_MULTIPLIER,
};
pub use crate::stats::univariate::{compute_mean_std, Sample};
pub use crate::trip::{GroupBy, Metric, ParseError, Trip};
