//! Classification of outliers
//!
//! WARNING: There's no formal/mathematical definition of what an outlier actually is. The sigma
//! rule provided here flags whatever lies outside `mean ± multiplier * std_dev`, which works well
//! for roughly bell-shaped metrics such as fare per kilometer, and poorly for heavy-tailed ones.

pub mod sigma;
