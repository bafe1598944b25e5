use std::ops;

use crate::error::{Error, Result};
use crate::stats::float::Float;

/// A collection of data points drawn from a population
///
/// Invariants:
///
/// - The sample contains at least 1 data point
/// - The sample contains no `NaN`s
#[repr(transparent)]
pub struct Sample<A>([A]);

impl<A> Sample<A>
where
    A: Float,
{
    /// Creates a new sample from an existing slice
    ///
    /// # Panics
    ///
    /// Panics if `slice` contains any `NaN` or if `slice` is empty
    #[allow(clippy::new_ret_no_self)]
    pub fn new(slice: &[A]) -> &Sample<A> {
        assert!(!slice.is_empty() && slice.iter().all(|x| !x.is_nan()));

        Sample::wrap(slice)
    }

    /// Creates a new sample from an existing slice, checking the invariants instead of panicking
    pub fn try_new(slice: &[A]) -> Result<&Sample<A>> {
        if slice.is_empty() {
            return Err(Error::EmptySample);
        }
        if slice.iter().any(|x| x.is_nan()) {
            return Err(Error::NotANumber);
        }

        Ok(Sample::wrap(slice))
    }

    fn wrap(slice: &[A]) -> &Sample<A> {
        // NB `Sample` is `repr(transparent)` over `[A]`, so the fat pointers share a layout
        unsafe { &*(slice as *const [A] as *const Sample<A>) }
    }

    /// Returns the biggest element in the sample
    ///
    /// - Time: `O(length)`
    pub fn max(&self) -> A {
        let mut elems = self.iter();

        match elems.next() {
            Some(&head) => elems.fold(head, |a, &b| a.max(b)),
            // NB `unreachable!` because `Sample` is guaranteed to have at least one data point
            None => unreachable!(),
        }
    }

    /// Returns the arithmetic average of the sample
    ///
    /// - Time: `O(length)`
    pub fn mean(&self) -> A {
        let n = self.len();

        self.sum() / A::cast(n)
    }

    /// Returns the mean and the population standard deviation, computed in two passes
    ///
    /// - Time: `O(length)`
    pub fn mean_std(&self) -> (A, A) {
        let mean = self.mean();

        (mean, self.std_dev(Some(mean)))
    }

    /// Returns the smallest element in the sample
    ///
    /// - Time: `O(length)`
    pub fn min(&self) -> A {
        let mut elems = self.iter();

        match elems.next() {
            Some(&elem) => elems.fold(elem, |a, &b| a.min(b)),
            // NB `unreachable!` because `Sample` is guaranteed to have at least one data point
            None => unreachable!(),
        }
    }

    /// Returns the population standard deviation of the sample
    ///
    /// The `mean` can be optionally passed along to speed up (2X) the computation
    ///
    /// - Time: `O(length)`
    pub fn std_dev(&self, mean: Option<A>) -> A {
        self.var(mean).sqrt()
    }

    /// Returns the sum of all the elements of the sample
    ///
    /// - Time: `O(length)`
    pub fn sum(&self) -> A {
        crate::stats::sum(self)
    }

    /// Returns the population variance of the sample
    ///
    /// The divisor is the number of data points, not the number of data points minus one: the
    /// sample is treated as the whole population of trips being screened.
    ///
    /// The `mean` can be optionally passed along to speed up (2X) the computation
    ///
    /// - Time: `O(length)`
    pub fn var(&self, mean: Option<A>) -> A {
        let mean = mean.unwrap_or_else(|| self.mean());

        crate::stats::sum_sq_dev(self, mean) / A::cast(self.len())
    }
}

impl<A> ops::Deref for Sample<A> {
    type Target = [A];

    fn deref(&self) -> &[A] {
        &self.0
    }
}

#[cfg(test)]
macro_rules! test {
    ($ty:ident) => {
        mod $ty {
            use approx::relative_eq;
            use quickcheck::quickcheck;
            use quickcheck::TestResult;

            use crate::stats::univariate::Sample;

            quickcheck! {
                fn mean_is_bounded(size: u8, start: u8) -> TestResult {
                    let size = size as usize;
                    let start = start as usize;
                    if let Some(v) = crate::stats::test::vec::<$ty>(size, start) {
                        let sample = Sample::new(&v[start..]);
                        let mean = sample.mean();
                        let (min, max) = (sample.min(), sample.max());

                        TestResult::from_bool(
                            (mean > min || relative_eq!(mean, min, max_relative = 1e-4)) &&
                            (mean < max || relative_eq!(mean, max, max_relative = 1e-4))
                        )
                    } else {
                        TestResult::discard()
                    }
                }
            }

            quickcheck! {
                fn variance_is_not_negative(size: u8, start: u8) -> TestResult {
                    let size = size as usize;
                    let start = start as usize;
                    if let Some(v) = crate::stats::test::vec::<$ty>(size, start) {
                        let sample = Sample::new(&v[start..]);

                        TestResult::from_bool(sample.var(None) >= 0.)
                    } else {
                        TestResult::discard()
                    }
                }
            }

            #[test]
            fn single_point_has_no_spread() {
                let v: [$ty; 1] = [4.25];
                let (mean, std_dev) = Sample::new(&v).mean_std();

                assert_eq!(mean, 4.25);
                assert_eq!(std_dev, 0.);
            }
        }
    };
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::Sample;
    use crate::error::Error;

    test!(f32);
    test!(f64);

    #[test]
    fn population_divisor() {
        let v = [2., 4., 4., 4., 5., 5., 7., 9.];
        let sample = Sample::new(&v);

        assert_relative_eq!(sample.mean(), 5.);
        assert_relative_eq!(sample.var(None), 4.);
        assert_relative_eq!(sample.std_dev(None), 2.);
    }

    #[test]
    fn try_new_rejects_invalid_slices() {
        let empty: [f64; 0] = [];

        assert!(matches!(Sample::try_new(&empty), Err(Error::EmptySample)));
        assert!(matches!(
            Sample::try_new(&[1., f64::NAN]),
            Err(Error::NotANumber)
        ));
        assert!(Sample::try_new(&[1., 2.]).is_ok());
    }

    #[test]
    #[should_panic]
    fn new_panics_on_empty_slice() {
        let empty: [f64; 0] = [];
        Sample::new(&empty);
    }
}
