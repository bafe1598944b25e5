//! Univariate analysis

mod sample;

pub mod outliers;

use crate::stats::float::Float;

pub use self::sample::Sample;

/// Returns the mean and the population standard deviation of `values`, or `None` if there are
/// no values
///
/// Both moments are computed in two passes over the data: the first one accumulates the mean,
/// the second one the squared deviations from it.
///
/// - Time: `O(length)`
pub fn compute_mean_std<A>(values: &[A]) -> Option<(A, A)>
where
    A: Float,
{
    if values.is_empty() {
        return None;
    }

    let n = A::cast(values.len());
    let mean = crate::stats::sum(values) / n;
    let std_dev = (crate::stats::sum_sq_dev(values, mean) / n).sqrt();

    Some((mean, std_dev))
}
