use std::io::Write;

use itertools::Itertools;

use crate::error::Result;
use crate::format;
use crate::trip::{GroupBy, Metric, Trip};

/// Dataset-wide averages, in the spirit of a dashboard's headline numbers
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Number of trips analyzed
    pub trips: usize,
    /// Number of trips dropped for having a non-positive distance or fare
    pub dropped: usize,
    /// Mean fare
    pub avg_fare: Option<f64>,
    /// Mean distance
    pub avg_distance_km: Option<f64>,
    /// Mean duration
    pub avg_duration_min: Option<f64>,
    /// Mean fare per kilometer
    pub avg_fare_per_km: Option<f64>,
    /// Mean speed
    pub avg_speed_kmph: Option<f64>,
}

/// The trips flagged by the sigma rule, along with the statistics behind the decision
#[derive(Clone, Debug, Serialize)]
pub struct OutlierSection<'a> {
    /// Metric that was screened
    pub metric: Metric,
    /// Number of standard deviations used for the thresholds
    pub multiplier: f64,
    /// Mean of the metric
    pub mean: Option<f64>,
    /// Population standard deviation of the metric
    pub std_dev: Option<f64>,
    /// Lower threshold
    pub low: Option<f64>,
    /// Upper threshold
    pub high: Option<f64>,
    /// Number of trips that provided the metric
    pub considered: usize,
    /// Number of trips that didn't
    pub skipped: usize,
    /// Flagged trips, in input order
    pub trips: Vec<&'a Trip>,
}

/// The most frequent keys of one grouping, by descending count
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ranking {
    /// The grouping
    pub group_by: GroupBy,
    /// `(key, count)` pairs
    pub entries: Vec<(String, usize)>,
}

/// Everything an [`Analysis`](crate::Analysis) produces
#[derive(Clone, Debug, Serialize)]
pub struct Report<'a> {
    /// Headline numbers
    pub summary: Summary,
    /// Outlier screening
    pub outliers: OutlierSection<'a>,
    /// One ranking per requested grouping
    pub rankings: Vec<Ranking>,
}

impl<'a> Report<'a> {
    /// Writes the report as pretty-printed JSON
    pub fn write_json<W: Write>(&self, mut w: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, self)?;
        writeln!(w)?;
        Ok(())
    }

    /// Writes the report as human readable text
    pub fn write_text<W: Write>(&self, mut w: W) -> Result<()> {
        self.write_summary(&mut w)?;
        writeln!(w)?;
        self.write_outliers(&mut w)?;

        for ranking in &self.rankings {
            writeln!(w)?;
            write_ranking(&mut w, ranking)?;
        }

        Ok(())
    }

    fn write_summary<W: Write>(&self, w: &mut W) -> Result<()> {
        let s = &self.summary;

        writeln!(
            w,
            "{:<24}{} ({} dropped)",
            "Trips analyzed:",
            format::integer(s.trips),
            format::integer(s.dropped)
        )?;
        for &(name, value) in &[
            ("Average fare:", s.avg_fare),
            ("Average distance (km):", s.avg_distance_km),
            ("Average duration (min):", s.avg_duration_min),
            ("Average fare per km:", s.avg_fare_per_km),
            ("Average speed (km/h):", s.avg_speed_kmph),
        ] {
            writeln!(w, "{:<24}{}", name, format::maybe(value))?;
        }

        Ok(())
    }

    fn write_outliers<W: Write>(&self, w: &mut W) -> Result<()> {
        let o = &self.outliers;

        writeln!(
            w,
            "Outliers by {} (mean \u{b1} {} std dev)",
            o.metric,
            format::short(o.multiplier)
        )?;
        writeln!(
            w,
            "  mean {}  std dev {}  thresholds [{}, {}]",
            format::maybe(o.mean),
            format::maybe(o.std_dev),
            format::maybe(o.low),
            format::maybe(o.high)
        )?;
        writeln!(
            w,
            "  {} values considered, {} skipped, {} {}",
            format::integer(o.considered),
            format::integer(o.skipped),
            format::integer(o.trips.len()),
            if o.trips.len() == 1 {
                "outlier"
            } else {
                "outliers"
            }
        )?;

        if o.trips.is_empty() {
            return Ok(());
        }

        writeln!(w, "  {:<12}{:<21}{}", "trip", "pickup", o.metric)?;
        for trip in &o.trips {
            writeln!(
                w,
                "  {:<12}{:<21}{}",
                trip.label(),
                trip.pickup_datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
                format::maybe(o.metric.value(trip))
            )?;
        }

        Ok(())
    }
}

fn write_ranking<W: Write>(w: &mut W, ranking: &Ranking) -> Result<()> {
    writeln!(
        w,
        "Most frequent {} (top {})",
        ranking.group_by,
        ranking.entries.len()
    )?;

    if ranking.entries.is_empty() {
        writeln!(w, "  (none)")?;
        return Ok(());
    }

    let width = ranking
        .entries
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    let lines = ranking
        .entries
        .iter()
        .enumerate()
        .map(|(i, (key, count))| {
            format!(
                "  {:>3}. {:<width$}  {}",
                i + 1,
                key,
                format::integer(*count),
                width = width
            )
        })
        .join("\n");

    writeln!(w, "{}", lines)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use crate::analysis::Analysis;
    use crate::trip::{GroupBy, Trip};

    fn trips() -> Vec<Trip> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut trips: Vec<Trip> = (0..12)
            .map(|i| {
                let mut t = Trip::new(
                    day.and_hms_opt(i, 0, 0).unwrap(),
                    day.and_hms_opt(i, 20, 0).unwrap(),
                    5.0,
                    12.5,
                );
                t.trip_id = Some(format!("t{}", i));
                t.payment_type = Some(String::from(if i % 3 == 0 { "cash" } else { "credit" }));
                t
            })
            .collect();
        trips[7].fare_amount = 80.0;
        trips
    }

    #[test]
    fn text() {
        let trips = trips();
        let report = Analysis::default()
            .multiplier(2.0)
            .group_by(vec![GroupBy::PaymentType])
            .run(&trips);

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("Trips analyzed:"));
        assert!(out.contains("12 (0 dropped)"));
        assert!(out.contains("Outliers by fare-per-km"));
        assert!(out.contains("1 outlier\n"));
        assert!(out.contains("t7"));
        assert!(out.contains("Most frequent payment-type (top 2)"));
        assert!(out.contains("  1. credit  8"));
        assert!(out.contains("  2. cash    4"));
    }

    #[test]
    fn json() {
        let trips = trips();
        let report = Analysis::default().multiplier(2.0).run(&trips);

        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["summary"]["trips"], 12);
        assert_eq!(value["outliers"]["metric"], "fare-per-km");
        assert_eq!(value["outliers"]["trips"][0]["trip_id"], "t7");
        assert_eq!(value["rankings"][0]["group_by"], "payment-type");
        assert_eq!(value["rankings"][0]["entries"][0][0], "credit");
    }
}
