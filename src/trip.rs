//! Trip records and the metrics derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        // Fractional seconds, e.g. "2024-01-01 08:00:00.000"
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok())
}

fn deserialize_datetime<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    parse_datetime(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", s)))
}

// Counts are sometimes exported as floats ("1.0")
fn deserialize_opt_count<'de, D>(d: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<f64> = Option::deserialize(d)?;
    match opt {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n as u32)),
        Some(n) => Err(serde::de::Error::custom(format!("invalid count: {}", n))),
        None => Ok(None),
    }
}

/// A single taxi trip
///
/// Column names follow the cleaned trip export; the raw yellow cab headers
/// (`tpep_pickup_datetime`, `trip_distance`, ...) are accepted as aliases.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Trip {
    /// Identifier assigned by the source, if any
    #[serde(default, alias = "id", alias = "raw_trip_id")]
    pub trip_id: Option<String>,
    /// Pickup time
    #[serde(
        alias = "tpep_pickup_datetime",
        alias = "pickup_time",
        deserialize_with = "deserialize_datetime"
    )]
    pub pickup_datetime: NaiveDateTime,
    /// Dropoff time
    #[serde(
        alias = "tpep_dropoff_datetime",
        alias = "dropoff_time",
        deserialize_with = "deserialize_datetime"
    )]
    pub dropoff_datetime: NaiveDateTime,
    /// Duration as recorded by the source, takes precedence over the timestamps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_duration_secs: Option<f64>,
    /// Distance travelled, in kilometers
    #[serde(alias = "trip_distance")]
    pub trip_distance_km: f64,
    /// Metered fare
    pub fare_amount: f64,
    /// Tip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_amount: Option<f64>,
    /// Number of passengers
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_opt_count"
    )]
    pub passenger_count: Option<u32>,
    /// Payment type, free form (`"credit"`, `"cash"`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    /// Pickup latitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_lat: Option<f64>,
    /// Pickup longitude
    #[serde(default, alias = "pickup_lng", skip_serializing_if = "Option::is_none")]
    pub pickup_lon: Option<f64>,
    /// Dropoff latitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_lat: Option<f64>,
    /// Dropoff longitude
    #[serde(default, alias = "dropoff_lng", skip_serializing_if = "Option::is_none")]
    pub dropoff_lon: Option<f64>,
    /// Precomputed fare per kilometer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_per_km: Option<f64>,
    /// Precomputed average speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_speed_kmph: Option<f64>,
}

impl Trip {
    /// Creates a trip from the fields every record carries
    pub fn new(
        pickup_datetime: NaiveDateTime,
        dropoff_datetime: NaiveDateTime,
        trip_distance_km: f64,
        fare_amount: f64,
    ) -> Trip {
        Trip {
            trip_id: None,
            pickup_datetime,
            dropoff_datetime,
            trip_duration_secs: None,
            trip_distance_km,
            fare_amount,
            tip_amount: None,
            passenger_count: None,
            payment_type: None,
            pickup_lat: None,
            pickup_lon: None,
            dropoff_lat: None,
            dropoff_lon: None,
            fare_per_km: None,
            avg_speed_kmph: None,
        }
    }

    /// Duration of the trip in seconds
    ///
    /// Uses the recorded duration when there is one, the difference between the timestamps
    /// otherwise. Can be zero or negative for broken records.
    pub fn duration_secs(&self) -> f64 {
        match self.trip_duration_secs {
            Some(secs) => secs,
            None => (self.dropoff_datetime - self.pickup_datetime).num_seconds() as f64,
        }
    }

    /// Fare paid per kilometer, `None` unless the distance is positive
    pub fn fare_per_km(&self) -> Option<f64> {
        if self.fare_per_km.is_some() {
            return self.fare_per_km;
        }

        if self.trip_distance_km > 0.0 {
            Some(self.fare_amount / self.trip_distance_km)
        } else {
            None
        }
    }

    /// Average speed in km/h, `None` unless the duration is positive
    pub fn avg_speed_kmph(&self) -> Option<f64> {
        if self.avg_speed_kmph.is_some() {
            return self.avg_speed_kmph;
        }

        let hours = self.duration_secs() / 3600.0;
        if hours > 0.0 {
            Some(self.trip_distance_km / hours)
        } else {
            None
        }
    }

    /// Hour of the day (0-23) the trip started
    pub fn pickup_hour(&self) -> u32 {
        self.pickup_datetime.hour()
    }

    /// A trip is kept for analysis when both its distance and its fare are positive
    pub fn is_valid(&self) -> bool {
        self.trip_distance_km > 0.0 && self.fare_amount > 0.0
    }

    /// Trip identifier for display, falls back to `"-"`
    pub fn label(&self) -> &str {
        self.trip_id.as_deref().unwrap_or("-")
    }
}

/// Error returned when parsing a `Metric` or a `GroupBy` from a string
#[derive(Debug, PartialEq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unexpected value: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Per-trip numeric field screened for outliers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Fare divided by distance
    FarePerKm,
    /// Distance divided by duration
    AvgSpeed,
    /// Metered fare
    Fare,
    /// Distance in kilometers
    Distance,
    /// Duration in minutes
    Duration,
    /// Tip amount
    Tip,
}

impl Metric {
    /// Every metric, in display order
    pub const ALL: &'static [Metric] = &[
        Metric::FarePerKm,
        Metric::AvgSpeed,
        Metric::Fare,
        Metric::Distance,
        Metric::Duration,
        Metric::Tip,
    ];

    /// Reads the metric off a trip, `None` when the trip can't provide it
    pub fn value(self, trip: &Trip) -> Option<f64> {
        match self {
            Metric::FarePerKm => trip.fare_per_km(),
            Metric::AvgSpeed => trip.avg_speed_kmph(),
            Metric::Fare => Some(trip.fare_amount),
            Metric::Distance => Some(trip.trip_distance_km),
            Metric::Duration => Some(trip.duration_secs() / 60.0),
            Metric::Tip => trip.tip_amount,
        }
    }

    /// Name used on the command line and in reports
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::FarePerKm => "fare-per-km",
            Metric::AvgSpeed => "avg-speed",
            Metric::Fare => "fare",
            Metric::Distance => "distance",
            Metric::Duration => "duration",
            Metric::Tip => "tip",
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::FarePerKm
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseError(s.to_owned()))
    }
}

/// Key trips are grouped by for "most frequent" rankings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupBy {
    /// Payment type, `"unknown"` when missing
    PaymentType,
    /// Hour of the pickup
    PickupHour,
    /// Pickup coordinates rounded to 6 decimals
    PickupLocation,
    /// Dropoff coordinates rounded to 6 decimals
    DropoffLocation,
}

fn location_key(lat: Option<f64>, lon: Option<f64>) -> Option<String> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(format!("{:.6},{:.6}", lat, lon)),
        _ => None,
    }
}

impl GroupBy {
    /// Every grouping, in display order
    pub const ALL: &'static [GroupBy] = &[
        GroupBy::PaymentType,
        GroupBy::PickupHour,
        GroupBy::PickupLocation,
        GroupBy::DropoffLocation,
    ];

    /// Returns the key of a trip, `None` when the trip doesn't carry the grouped field
    pub fn key(self, trip: &Trip) -> Option<String> {
        match self {
            GroupBy::PaymentType => Some(
                trip.payment_type
                    .clone()
                    .unwrap_or_else(|| String::from("unknown")),
            ),
            GroupBy::PickupHour => Some(format!("{:02}:00", trip.pickup_hour())),
            GroupBy::PickupLocation => location_key(trip.pickup_lat, trip.pickup_lon),
            GroupBy::DropoffLocation => location_key(trip.dropoff_lat, trip.dropoff_lon),
        }
    }

    /// Name used on the command line and in reports
    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::PaymentType => "payment-type",
            GroupBy::PickupHour => "pickup-hour",
            GroupBy::PickupLocation => "pickup-location",
            GroupBy::DropoffLocation => "dropoff-location",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupBy::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ParseError(s.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use chrono::NaiveDateTime;

    use super::{parse_datetime, GroupBy, Metric, ParseError, Trip};

    fn at(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn trip(pickup: &str, dropoff: &str, distance: f64, fare: f64) -> Trip {
        Trip::new(at(pickup), at(dropoff), distance, fare)
    }

    #[test]
    fn derived_metrics() {
        let t = trip("2024-01-01 10:00:00", "2024-01-01 10:05:00", 1.2, 18.0);

        assert_relative_eq!(t.duration_secs(), 300.0);
        assert_relative_eq!(t.fare_per_km().unwrap(), 15.0, max_relative = 1e-12);
        assert_relative_eq!(t.avg_speed_kmph().unwrap(), 14.4, max_relative = 1e-12);
        assert_eq!(t.pickup_hour(), 10);
        assert!(t.is_valid());
    }

    #[test]
    fn recorded_values_take_precedence() {
        let mut t = trip("2024-01-01 10:00:00", "2024-01-01 10:05:00", 2.0, 10.0);
        t.trip_duration_secs = Some(600.0);
        t.fare_per_km = Some(4.5);

        assert_relative_eq!(t.fare_per_km().unwrap(), 4.5);
        assert_relative_eq!(t.avg_speed_kmph().unwrap(), 12.0, max_relative = 1e-12);
    }

    #[test]
    fn degenerate_trips_have_no_ratios() {
        let t = trip("2024-01-01 10:00:00", "2024-01-01 10:00:00", 0.0, 3.0);

        assert_eq!(t.fare_per_km(), None);
        assert_eq!(t.avg_speed_kmph(), None);
        assert!(!t.is_valid());
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(at("2024-01-01T08:30:00"), at("2024-01-01 08:30:00"));
        assert_eq!(at("2024-01-01 08:30"), at("2024-01-01 08:30:00"));
        assert_eq!(at("2024-01-01 08:30:00.000"), at("2024-01-01 08:30:00"));
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn metric_names_round_trip() {
        for &m in Metric::ALL {
            assert_eq!(m.as_str().parse::<Metric>(), Ok(m));
        }
        assert_eq!(
            "speed".parse::<Metric>(),
            Err(ParseError(String::from("speed")))
        );
    }

    #[test]
    fn group_keys() {
        let mut t = trip("2024-01-01 08:00:00", "2024-01-01 08:30:00", 10.5, 25.0);

        assert_eq!(GroupBy::PaymentType.key(&t).as_deref(), Some("unknown"));
        assert_eq!(GroupBy::PickupHour.key(&t).as_deref(), Some("08:00"));
        assert_eq!(GroupBy::PickupLocation.key(&t), None);

        t.payment_type = Some(String::from("credit"));
        t.pickup_lat = Some(40.7614);
        t.pickup_lon = Some(-73.9776);

        assert_eq!(GroupBy::PaymentType.key(&t).as_deref(), Some("credit"));
        assert_eq!(
            GroupBy::PickupLocation.key(&t).as_deref(),
            Some("40.761400,-73.977600")
        );
        assert_eq!(
            "dropoff-location".parse::<GroupBy>(),
            Ok(GroupBy::DropoffLocation)
        );
    }
}
