mod error;
mod types;

use error::Error;
pub use types::OutputFormat;

use std::{env, ffi::OsString, path::PathBuf, str::FromStr};

use clap::{App, Arg, ArgMatches};
use trip_stats::{Analysis, GroupBy, Metric};

const DEFAULT_INPUT: &str = "cleaned_trips.csv";

#[derive(Debug, PartialEq)]
pub struct Args {
    pub input: PathBuf,
    pub multiplier: Option<f64>,
    pub top_k: Option<usize>,
    pub metric: Option<Metric>,
    pub group_by: Option<Vec<GroupBy>>,
    pub keep_invalid: bool,
    pub output_format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            input: PathBuf::from(DEFAULT_INPUT),
            multiplier: None,
            top_k: None,
            metric: None,
            group_by: None,
            keep_invalid: false,
            output_format: OutputFormat::default(),
            verbose: false,
            quiet: false,
        }
    }
}

impl Args {
    /// Applies the settings given on the command line on top of the analysis defaults
    pub fn analysis(&self) -> trip_stats::Result<Analysis> {
        let mut analysis = Analysis::default().keep_invalid(self.keep_invalid);

        if let Some(m) = self.multiplier {
            analysis = analysis.try_multiplier(m)?;
        }
        if let Some(k) = self.top_k {
            analysis = analysis.top_k(k);
        }
        if let Some(metric) = self.metric {
            analysis = analysis.metric(metric);
        }
        if let Some(group_by) = &self.group_by {
            analysis = analysis.group_by(group_by.clone());
        }

        Ok(analysis)
    }
}

pub fn parse_args() -> Args {
    let args = env::args_os().collect();
    match try_parse_args(args) {
        Ok(args) => args,
        Err(Error::Clap(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error parsing CLI args: {}", e);
            eprintln!("For more information try --help");
            std::process::exit(1);
        }
    }
}

fn app() -> App<'static, 'static> {
    App::new("trip-stats")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Flags anomalous taxi trips and ranks the most frequent trip attributes")
        .arg(
            Arg::with_name("INPUT")
                .help("Cleaned trip data, as CSV")
                .env("CLEANED_CSV")
                .default_value(DEFAULT_INPUT)
                .index(1),
        )
        .arg(
            Arg::with_name("multiplier")
                .short("m")
                .long("multiplier")
                .value_name("SIGMAS")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Flag values further than SIGMAS standard deviations from the mean [default: 3]"),
        )
        .arg(
            Arg::with_name("top")
                .short("k")
                .long("top")
                .value_name("K")
                .takes_value(true)
                .help("Length of each ranking, 0 disables them [default: 10]"),
        )
        .arg(
            Arg::with_name("metric")
                .long("metric")
                .takes_value(true)
                .help(
                    "Per-trip value screened for outliers: fare-per-km, avg-speed, fare, \
                     distance, duration or tip [default: fare-per-km]",
                ),
        )
        .arg(
            Arg::with_name("group-by")
                .long("group-by")
                .takes_value(true)
                .multiple(true)
                .use_delimiter(true)
                .require_delimiter(true)
                .help(
                    "Comma separated keys to rank, among payment-type, pickup-hour, \
                     pickup-location and dropoff-location [default: payment-type,pickup-hour]",
                ),
        )
        .arg(
            Arg::with_name("keep-invalid")
                .long("keep-invalid")
                .help("Keep trips with a non-positive distance or fare"),
        )
        .arg(
            Arg::with_name("output-format")
                .long("output-format")
                .takes_value(true)
                .help("Report format, text or json [default: text]"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .conflicts_with("quiet")
                .help("Log timings and statistics, unless RUST_LOG says otherwise"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Log errors only, unless RUST_LOG says otherwise"),
        )
        .after_help("The input path can also be set through the CLEANED_CSV environment variable.")
}

fn number<T: FromStr>(matches: &ArgMatches<'_>, name: &'static str) -> Result<Option<T>, Error> {
    matches
        .value_of(name)
        .map(|s| {
            s.parse()
                .map_err(|_| Error::InvalidNumber(name, s.to_owned()))
        })
        .transpose()
}

fn try_parse_args(args: Vec<OsString>) -> Result<Args, Error> {
    let matches = app().get_matches_from_safe(args)?;

    let input = matches
        .value_of_os("INPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    // Flags with values first
    let multiplier = number(&matches, "multiplier")?;
    let top_k = number(&matches, "top")?;
    let metric = matches
        .value_of("metric")
        .map(str::parse::<Metric>)
        .transpose()
        .map_err(Error::InvalidMetric)?;
    let group_by = matches
        .values_of("group-by")
        .map(|values| values.map(str::parse::<GroupBy>).collect::<Result<Vec<GroupBy>, _>>())
        .transpose()
        .map_err(Error::InvalidGroupBy)?;
    let output_format = matches
        .value_of("output-format")
        .map(str::parse::<OutputFormat>)
        .transpose()
        .map_err(Error::InvalidOutputFormat)?
        .unwrap_or_default();

    // Now flags without values
    let keep_invalid = matches.is_present("keep-invalid");
    let verbose = matches.is_present("verbose");
    let quiet = matches.is_present("quiet");

    Ok(Args {
        input,
        multiplier,
        top_k,
        metric,
        group_by,
        keep_invalid,
        output_format,
        verbose,
        quiet,
    })
}
