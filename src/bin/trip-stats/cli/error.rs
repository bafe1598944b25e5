use std::fmt;

use super::types::TypeParseError;

#[derive(Debug)]
pub enum Error {
    Clap(clap::Error),
    InvalidNumber(&'static str, String),
    InvalidMetric(trip_stats::ParseError),
    InvalidGroupBy(trip_stats::ParseError),
    InvalidOutputFormat(TypeParseError),
}

impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Self {
        Self::Clap(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clap(err) => write!(f, "Arg-parse error: {}", err),
            Self::InvalidNumber(flag, s) => write!(f, "Invalid value for '--{}': {}", flag, s),
            Self::InvalidMetric(err) => write!(f, "Invalid metric: {}", err),
            Self::InvalidGroupBy(err) => write!(f, "Invalid grouping: {}", err),
            Self::InvalidOutputFormat(err) => write!(f, "Invalid output format: {}", err),
        }
    }
}
