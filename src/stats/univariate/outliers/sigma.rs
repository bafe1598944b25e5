//! Sigma-threshold rule
//!
//! The rule places two symmetric "thresholds" around the mean of the sample, at a distance of
//! `multiplier` population standard deviations:
//!
//! ``` ignore
//! let (low, high) = (mean - multiplier * std_dev, mean + multiplier * std_dev);
//!
//! let is_outlier = |x| x < low || x > high;
//! ```
//!
//! The comparisons are strict, so a data point sitting exactly on a threshold is *not* an
//! outlier. A sample with no spread (`std_dev == 0`) collapses both thresholds onto the mean and
//! therefore never yields an outlier, whatever the multiplier.
//!
//! ``` ignore
//!          LOW                      NORMAL                       HIGH
//!       x    x   |   o  o    o  o   o    o   o  o   o  |    x
//!               low                mean               high
//! ```
//!
//! Keep in mind that with the population standard deviation no data point of an `n`-point sample
//! can lie further than `sqrt(n - 1)` standard deviations from the mean, so tiny samples cannot
//! produce outliers for large multipliers.

use std::ops::Deref;
use std::slice;

use crate::error::{Error, Result};
use crate::stats::float::Float;
use crate::stats::univariate::{compute_mean_std, Sample};

use self::Label::*;

/// Multiplier used when the caller doesn't pick one
pub const DEFAULT_MULTIPLIER: f64 = 3.0;

/// The `(low, high)` pair of thresholds derived from `mean ± multiplier * std_dev`
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Thresholds<A> {
    low: A,
    high: A,
}

impl<A> Thresholds<A>
where
    A: Float,
{
    /// Computes the thresholds from the moments of a sample
    pub fn new(mean: A, std_dev: A, multiplier: A) -> Thresholds<A> {
        let spread = multiplier * std_dev;

        Thresholds {
            low: mean - spread,
            high: mean + spread,
        }
    }

    /// Computes the thresholds from the output of
    /// [`compute_mean_std`](crate::stats::univariate::compute_mean_std)
    ///
    /// An empty sample has no moments, and asking for thresholds anyway is a usage error
    /// signaled with `Error::EmptySample`.
    pub fn from_moments(moments: Option<(A, A)>, multiplier: A) -> Result<Thresholds<A>> {
        match moments {
            Some((mean, std_dev)) => Ok(Thresholds::new(mean, std_dev, multiplier)),
            None => Err(Error::EmptySample),
        }
    }

    /// Returns the lower threshold
    pub fn low(&self) -> A {
        self.low
    }

    /// Returns the upper threshold
    pub fn high(&self) -> A {
        self.high
    }

    /// Labels a data point
    pub fn label(&self, x: A) -> Label {
        if x > self.high {
            High
        } else if x < self.low {
            Low
        } else {
            NotAnOutlier
        }
    }

    /// Checks if a data point lies strictly outside the thresholds
    pub fn is_outlier(&self, x: A) -> bool {
        self.label(x).is_outlier()
    }
}

/// Labels used to classify outliers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    /// Above the upper threshold
    High,
    /// Below the lower threshold
    Low,
    /// A normal data point
    NotAnOutlier,
}

impl Label {
    /// Checks if the data point has an "unusually" high value
    pub fn is_high(&self) -> bool {
        matches!(*self, High)
    }

    /// Checks if the data point has an "unusually" low value
    pub fn is_low(&self) -> bool {
        matches!(*self, Low)
    }

    /// Checks if the data point is labeled as an outlier
    pub fn is_outlier(&self) -> bool {
        !matches!(*self, NotAnOutlier)
    }
}

/// A classified/labeled sample.
///
/// The order of the data points is retained.
#[derive(Clone, Copy)]
pub struct LabeledSample<'a, A>
where
    A: Float,
{
    thresholds: Thresholds<A>,
    sample: &'a Sample<A>,
}

impl<'a, A> LabeledSample<'a, A>
where
    A: Float,
{
    /// Returns the number of data points per label, as `(low, normal, high)`
    ///
    /// - Time: `O(length)`
    pub fn count(&self) -> (usize, usize, usize) {
        let (mut low, mut normal, mut high) = (0, 0, 0);

        for (_, label) in self {
            match label {
                Low => low += 1,
                NotAnOutlier => normal += 1,
                High => high += 1,
            }
        }

        (low, normal, high)
    }

    /// Returns the thresholds used to classify the outliers
    pub fn thresholds(&self) -> Thresholds<A> {
        self.thresholds
    }

    /// Returns an iterator over the labeled data
    pub fn iter(&self) -> Iter<'a, A> {
        Iter {
            thresholds: self.thresholds,
            iter: self.sample.iter(),
        }
    }
}

impl<'a, A> Deref for LabeledSample<'a, A>
where
    A: Float,
{
    type Target = Sample<A>;

    fn deref(&self) -> &Sample<A> {
        self.sample
    }
}

impl<'a, A> IntoIterator for &LabeledSample<'a, A>
where
    A: Float,
{
    type Item = (A, Label);
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Iter<'a, A> {
        self.iter()
    }
}

/// Iterator over the labeled data
pub struct Iter<'a, A>
where
    A: Float,
{
    thresholds: Thresholds<A>,
    iter: slice::Iter<'a, A>,
}

impl<'a, A> Iterator for Iter<'a, A>
where
    A: Float,
{
    type Item = (A, Label);

    fn next(&mut self) -> Option<(A, Label)> {
        let thresholds = self.thresholds;

        self.iter.next().map(|&x| (x, thresholds.label(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Classifies the sample, and returns a labeled sample.
///
/// - Time: `O(length)`
pub fn classify<A>(sample: &Sample<A>, multiplier: A) -> LabeledSample<'_, A>
where
    A: Float,
{
    let (mean, std_dev) = sample.mean_std();

    LabeledSample {
        thresholds: Thresholds::new(mean, std_dev, multiplier),
        sample,
    }
}

/// Result of screening a collection of records
pub struct Detection<'a, R, A> {
    /// Records flagged as outliers, in their original relative order
    pub outliers: Vec<&'a R>,
    /// Mean of the field over the records that have it
    pub mean: Option<A>,
    /// Population standard deviation of the field over the records that have it
    pub std_dev: Option<A>,
    /// Thresholds the records were tested against, `None` if no record had the field
    pub thresholds: Option<Thresholds<A>>,
    /// Number of records whose field was present
    pub considered: usize,
    /// Number of records whose field was missing (or `NaN`), these are never flagged
    pub skipped: usize,
}

// `NaN` can't be ordered against the thresholds, so it counts as a missing value
fn value_of<R, A, F>(field: &F, record: &R) -> Option<A>
where
    A: Float,
    F: Fn(&R) -> Option<A>,
{
    field(record).filter(|v| !v.is_nan())
}

/// Screens `records` with the sigma rule applied to the value returned by `field`
///
/// Records for which `field` returns `None` are left out of the statistics and are never
/// flagged. If no record has the field, the detection is empty.
///
/// - Time: `O(length)`
pub fn scan<'a, R, A, F>(records: &'a [R], field: F, multiplier: A) -> Detection<'a, R, A>
where
    A: Float,
    F: Fn(&R) -> Option<A>,
{
    let values: Vec<A> = records
        .iter()
        .filter_map(|r| value_of(&field, r))
        .collect();
    let considered = values.len();
    let skipped = records.len() - considered;

    let moments = compute_mean_std(&values);
    let thresholds = moments.map(|(mean, std_dev)| Thresholds::new(mean, std_dev, multiplier));

    let outliers: Vec<&R> = match thresholds {
        Some(thresholds) => records
            .iter()
            .filter(|&r| value_of(&field, r).map_or(false, |v| thresholds.is_outlier(v)))
            .collect(),
        None => Vec::new(),
    };

    debug!(
        "sigma rule: {} values considered, {} skipped, {} outliers",
        considered,
        skipped,
        outliers.len()
    );

    Detection {
        outliers,
        mean: moments.map(|(mean, _)| mean),
        std_dev: moments.map(|(_, std_dev)| std_dev),
        thresholds,
        considered,
        skipped,
    }
}

/// Returns the records whose field lies strictly outside `mean ± multiplier * std_dev`
///
/// See [`scan`] for the treatment of missing values.
pub fn detect_outliers<'a, R, A, F>(records: &'a [R], field: F, multiplier: A) -> Vec<&'a R>
where
    A: Float,
    F: Fn(&R) -> Option<A>,
{
    scan(records, field, multiplier).outliers
}
