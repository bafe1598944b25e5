//! Statistics used to rank and screen trip records.
//!
//! - [`heap`]: a binary min-heap with a fully specified tie policy
//! - [`top_k`]: bounded selection of the `k` largest entries of a stream
//! - [`univariate`]: samples, their moments, and sigma-rule outlier classification
//!
//! Every computation here is a pure function of its inputs; nothing is cached between calls.

#[cfg(test)]
mod test;

pub mod heap;
pub mod top_k;
pub mod univariate;

mod float;

pub use self::float::Float;

fn sum<A>(xs: &[A]) -> A
where
    A: Float,
{
    use std::ops::Add;

    xs.iter().cloned().fold(A::cast(0), Add::add)
}

// Second pass of the two-pass variance: the mean must come from the same values
fn sum_sq_dev<A>(xs: &[A], mean: A) -> A
where
    A: Float,
{
    use std::ops::Add;

    xs.iter()
        .map(|&x| (x - mean).powi(2))
        .fold(A::cast(0), Add::add)
}
