#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::report::{OutlierSection, Ranking, Report, Summary};
use crate::stats::top_k::most_frequent;
use crate::stats::univariate::compute_mean_std;
use crate::stats::univariate::outliers::sigma::{self, DEFAULT_MULTIPLIER};
use crate::trip::{GroupBy, Metric, Trip};

macro_rules! elapsed {
    ($msg:expr, $block:expr) => {{
        let start = ::std::time::Instant::now();
        let out = $block;
        let elapsed = &start.elapsed();

        debug!(
            "{} took {}",
            $msg,
            crate::format::time(elapsed.as_nanos() as f64)
        );

        out
    }};
}

/// The analysis configuration
///
/// Screens a set of trips for outliers of one [`Metric`] and ranks the most frequent keys of
/// each requested [`GroupBy`].
///
/// ```
/// use trip_stats::{Analysis, GroupBy, Metric};
///
/// let analysis = Analysis::default()
///     .metric(Metric::AvgSpeed)
///     .multiplier(2.5)
///     .top_k(5)
///     .group_by(vec![GroupBy::PickupHour]);
///
/// let report = analysis.run(&[]);
/// assert_eq!(report.summary.trips, 0);
/// assert!(report.outliers.trips.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    multiplier: f64,
    top_k: usize,
    metric: Metric,
    group_by: Vec<GroupBy>,
    keep_invalid: bool,
}

impl Default for Analysis {
    /// Creates an analysis with the default settings:
    ///
    /// - Multiplier: 3.0
    /// - Top-k: 10
    /// - Metric: fare per km
    /// - Group by: payment type, pickup hour
    /// - Invalid trips (non-positive distance or fare) are dropped
    fn default() -> Analysis {
        Analysis {
            multiplier: DEFAULT_MULTIPLIER,
            top_k: 10,
            metric: Metric::default(),
            group_by: vec![GroupBy::PaymentType, GroupBy::PickupHour],
            keep_invalid: false,
        }
    }
}

impl Analysis {
    /// Changes the number of standard deviations a value must be away from the mean to be
    /// flagged
    ///
    /// # Panics
    ///
    /// Panics if the multiplier is negative, `NaN` or infinite
    pub fn multiplier(mut self, m: f64) -> Analysis {
        assert!(m.is_finite() && m >= 0.0);

        self.multiplier = m;
        self
    }

    /// Like [`Analysis::multiplier`], but reports an invalid multiplier instead of panicking
    pub fn try_multiplier(self, m: f64) -> Result<Analysis> {
        if m.is_finite() && m >= 0.0 {
            Ok(self.multiplier(m))
        } else {
            Err(Error::InvalidMultiplier(m))
        }
    }

    /// Changes the length of the rankings. Zero disables them.
    pub fn top_k(mut self, k: usize) -> Analysis {
        self.top_k = k;
        self
    }

    /// Changes the metric screened for outliers
    pub fn metric(mut self, metric: Metric) -> Analysis {
        self.metric = metric;
        self
    }

    /// Changes the keys trips are ranked by, one ranking per key
    pub fn group_by(mut self, group_by: Vec<GroupBy>) -> Analysis {
        self.group_by = group_by;
        self
    }

    /// Keeps trips with a non-positive distance or fare in the analysis
    pub fn keep_invalid(mut self, keep: bool) -> Analysis {
        self.keep_invalid = keep;
        self
    }

    /// Runs the analysis over `trips`
    pub fn run<'a>(&self, trips: &'a [Trip]) -> Report<'a> {
        let (valid, dropped) = if self.keep_invalid {
            (trips.iter().collect::<Vec<_>>(), 0)
        } else {
            let valid: Vec<&Trip> = trips.iter().filter(|t| t.is_valid()).collect();
            let dropped = trips.len() - valid.len();
            (valid, dropped)
        };
        if dropped > 0 {
            info!("Dropped {} trips with a non-positive distance or fare", dropped);
        }

        let summary = summarize(&valid, dropped);

        let metric = self.metric;
        let detection = elapsed!(
            "Outlier detection",
            sigma::scan(&valid, |t| metric.value(t), self.multiplier)
        );
        let outliers = OutlierSection {
            metric,
            multiplier: self.multiplier,
            mean: detection.mean,
            std_dev: detection.std_dev,
            low: detection.thresholds.map(|t| t.low()),
            high: detection.thresholds.map(|t| t.high()),
            considered: detection.considered,
            skipped: detection.skipped,
            trips: detection.outliers.into_iter().map(|&t| t).collect(),
        };

        let rankings = elapsed!("Rankings", self.rankings(&valid));

        Report {
            summary,
            outliers,
            rankings,
        }
    }

    fn rankings(&self, trips: &[&Trip]) -> Vec<Ranking> {
        let k = self.top_k;
        let rank = |group_by: &GroupBy| Ranking {
            group_by: *group_by,
            entries: most_frequent(trips.iter().filter_map(|t| group_by.key(t)), k),
        };

        #[cfg(feature = "rayon")]
        {
            self.group_by.par_iter().map(rank).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.group_by.iter().map(rank).collect()
        }
    }
}

fn mean_of<F>(trips: &[&Trip], f: F) -> Option<f64>
where
    F: Fn(&Trip) -> Option<f64>,
{
    let values: Vec<f64> = trips.iter().filter_map(|&t| f(t)).collect();

    compute_mean_std(&values).map(|(mean, _)| mean)
}

fn summarize(trips: &[&Trip], dropped: usize) -> Summary {
    Summary {
        trips: trips.len(),
        dropped,
        avg_fare: mean_of(trips, |t| Some(t.fare_amount)),
        avg_distance_km: mean_of(trips, |t| Some(t.trip_distance_km)),
        avg_duration_min: mean_of(trips, |t| Some(t.duration_secs() / 60.0)),
        avg_fare_per_km: mean_of(trips, Trip::fare_per_km),
        avg_speed_kmph: mean_of(trips, Trip::avg_speed_kmph),
    }
}
