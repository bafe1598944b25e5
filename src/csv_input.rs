//! Reading trips from CSV files.
//!
//! The first row must hold the column names; see [`Trip`] for the accepted names. Rows that fail
//! to parse are logged and skipped rather than aborting the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{Error, Result};
use crate::trip::Trip;

/// Trips read from a CSV source
#[derive(Debug, Default)]
pub struct Loaded {
    /// Successfully parsed trips, in file order
    pub trips: Vec<Trip>,
    /// Number of rows that couldn't be parsed
    pub skipped: usize,
}

/// Reads every trip from `reader`
///
/// Fails only if the header row can't be read; malformed rows are counted in
/// [`Loaded::skipped`].
pub fn read_trips<R: Read>(reader: R) -> ::std::result::Result<Loaded, csv::Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    reader.headers()?;

    let mut loaded = Loaded::default();
    for (i, row) in reader.deserialize::<Trip>().enumerate() {
        match row {
            Ok(trip) => loaded.trips.push(trip),
            Err(e) => {
                // Row 1 is the header
                warn!("Skipping row {} due to parse error: {}", i + 2, e);
                loaded.skipped += 1;
            }
        }
    }

    Ok(loaded)
}

/// Reads every trip from the CSV file at `path`
pub fn load_trips<P: AsRef<Path>>(path: P) -> Result<Loaded> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|inner| Error::AccessError {
        path: path.to_owned(),
        inner,
    })?;

    let loaded = read_trips(file).map_err(|inner| Error::CsvError {
        path: path.to_owned(),
        inner,
    })?;

    info!(
        "Loaded {} trips from {:?} ({} rows skipped)",
        loaded.trips.len(),
        path,
        loaded.skipped
    );
    Ok(loaded)
}
