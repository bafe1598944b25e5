#![cfg(feature = "csv_input")]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use serde_json::Value;
use tempfile::{tempdir, TempDir};
use trip_stats::csv_input::load_trips;
use trip_stats::{detect_outliers, top_k, Analysis, Error, GroupBy, Metric};

/*
 * The five trips used throughout the documentation. Trip 3 is a short, expensive ride; its fare
 * per km (15.0) is the only one far from the others (about 2.1 to 2.7).
 */
const SEED: &str = "\
trip_id,pickup_datetime,dropoff_datetime,trip_duration_secs,trip_distance_km,fare_amount,passenger_count,payment_type
1,2024-01-01 08:00:00,2024-01-01 08:30:00,1800,10.5,25.0,1,credit
2,2024-01-01 09:15:00,2024-01-01 09:45:00,1800,8.2,22.0,2,cash
3,2024-01-01 10:00:00,2024-01-01 10:05:00,300,1.2,18.0,1,credit
4,2024-01-01 11:00:00,2024-01-01 11:20:00,1200,6.0,14.0,1,credit
5,2024-01-01 12:00:00,2024-01-01 12:35:00,2100,12.0,30.0,3,cash
";

fn temp_dir() -> TempDir {
    tempdir().unwrap()
}

fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("cleaned_trips.csv");
    let mut file = File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn short_expensive_trip_is_flagged() {
    let dir = temp_dir();
    let loaded = load_trips(write_csv(&dir, SEED)).unwrap();
    assert_eq!(loaded.trips.len(), 5);
    assert_eq!(loaded.skipped, 0);

    let report = Analysis::default().multiplier(1.5).run(&loaded.trips);
    let flagged: Vec<&str> = report.outliers.trips.iter().map(|t| t.label()).collect();
    assert_eq!(flagged, vec!["3"]);

    // With five values no point can be three standard deviations away from the mean
    let report = Analysis::default().run(&loaded.trips);
    assert!(report.outliers.trips.is_empty());
}

#[test]
fn free_functions_agree_with_the_analysis() {
    let dir = temp_dir();
    let loaded = load_trips(write_csv(&dir, SEED)).unwrap();

    let outliers = detect_outliers(&loaded.trips, |t| t.fare_per_km(), 1.5);
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].trip_id.as_deref(), Some("3"));

    let longest = top_k(
        loaded
            .trips
            .iter()
            .map(|t| (t.label(), t.trip_distance_km)),
        2,
    );
    assert_eq!(longest, vec![("5", 12.0), ("1", 10.5)]);
}

#[test]
fn json_report() {
    let dir = temp_dir();
    let loaded = load_trips(write_csv(&dir, SEED)).unwrap();

    let report = Analysis::default()
        .multiplier(1.5)
        .metric(Metric::FarePerKm)
        .group_by(vec![GroupBy::PaymentType])
        .top_k(1)
        .run(&loaded.trips);

    let mut out = Vec::new();
    report.write_json(&mut out).unwrap();
    let json: Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["summary"]["trips"], 5);
    assert_eq!(json["outliers"]["considered"], 5);
    assert_eq!(json["outliers"]["trips"][0]["trip_id"], "3");
    assert_eq!(json["rankings"][0]["entries"][0][0], "credit");
    assert_eq!(json["rankings"][0]["entries"][0][1], 3);
    assert_eq!(json["rankings"][0]["entries"].as_array().unwrap().len(), 1);
}

#[test]
fn missing_file() {
    let dir = temp_dir();
    let path = dir.path().join("nope.csv");

    match load_trips(&path) {
        Err(Error::AccessError { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected an access error, got {:?}", other.map(|l| l.trips.len())),
    }
}

#[test]
fn empty_file_yields_no_trips() {
    let dir = temp_dir();
    let header = SEED.lines().next().unwrap();
    let loaded = load_trips(write_csv(&dir, &format!("{}\n", header))).unwrap();

    assert!(loaded.trips.is_empty());
    let report = Analysis::default().run(&loaded.trips);
    assert_eq!(report.summary.trips, 0);
    assert_eq!(report.outliers.mean, None);
    assert!(report.outliers.trips.is_empty());
}
