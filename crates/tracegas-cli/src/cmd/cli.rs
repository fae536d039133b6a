use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::cmd::config::{Action, Config, Grid, Process, Seasonal, Source, Tanks};
use tracegas_core::constants::{GRID_EPOCH_YEAR, GRID_YEARS, MIN_MONTHLY_COUNT, MONTHLY_FIRST_YEAR, MONTHLY_MONTHS};
use tracegas_core::gastype::GasType;
use tracegas_core::grid::GridSpec;
use tracegas_core::monthly::MonthlyBins;
use tracegas_core::output::OutputFormat;
use tracegas_core::series::HourWindow;

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{s}: {e}"))
}

/// `YYYY-MM`
fn parse_year_month(s: &str) -> Result<(i32, u32), String> {
    let (y, m) = s.split_once('-').ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
    let year: i32 = y.parse().map_err(|_| format!("invalid year '{y}'"))?;
    let month: u32 = m.parse().map_err(|_| format!("invalid month '{m}'"))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month out of range: {month}"));
    }
    Ok((year, month))
}

#[derive(Debug, Parser)]
#[command(
    name = "tracegas",
    about = "Isotope-corrected CH4/CO2 series from GCWerks exports",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Correct, filter and align a series to meteo data
    Process(ProcessArgs),

    /// Bucket a series to the 20-minute grid
    Grid(GridArgs),

    /// Afternoon detrend and monthly statistics
    Seasonal(SeasonalArgs),

    /// Per-tank run times and ambient means between runs
    Tanks(SourceArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Gas species of the input file
    #[arg(short = 'g', long = "gas", default_value = "ch4")]
    pub gas: GasType,

    /// GCWerks export
    #[arg(short = 'i', long = "input", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output file
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// JSON species config replacing the built-in preset
    #[arg(long = "species-config", value_name = "JSON")]
    pub species_config: Option<PathBuf>,

    /// Skip the humidity correction of δ13C
    #[arg(long = "no-correction")]
    pub no_correction: bool,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Meteo csv files or glob patterns (quote the pattern)
    #[arg(short = 'm', long = "met", num_args = 1.., value_hint = ValueHint::AnyPath)]
    pub met: Vec<String>,

    /// Output format, guessed from the output extension when missing
    #[arg(long = "format")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First day of the grid
    #[arg(long = "epoch", value_parser = parse_date, value_name = "YYYY-MM-DD")]
    pub epoch: Option<NaiveDate>,

    /// Calendar years covered
    #[arg(long = "years", default_value_t = GRID_YEARS)]
    pub years: i32,

    /// Hours copied to the `_day` sub-grid
    #[arg(long = "afternoon", default_value = "13-17")]
    pub afternoon: HourWindow,

    #[arg(long = "format")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Args)]
pub struct SeasonalArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First afternoon record used in the fit
    #[arg(long = "detrend-start", default_value_t = 0)]
    pub detrend_start: usize,

    /// Months need more than this many values for box statistics
    #[arg(long = "min-count", default_value_t = MIN_MONTHLY_COUNT)]
    pub min_count: usize,

    #[arg(long = "first-month", value_parser = parse_year_month, value_name = "YYYY-MM")]
    pub first_month: Option<(i32, u32)>,

    #[arg(long = "months", default_value_t = MONTHLY_MONTHS)]
    pub months: usize,

    #[arg(long = "afternoon", default_value = "13-17")]
    pub afternoon: HourWindow,
}

impl SourceArgs {
    fn into_source(self) -> Source {
        Source {
            gas: self.gas,
            input: self.input,
            output: self.output,
            species_config: self.species_config,
            no_correction: self.no_correction,
        }
    }
}

// -------- Map CLI -> Config/Action types --------

impl Cli {
    pub fn into_config(self) -> Config {
        let action = match self.command {
            Commands::Process(p) => {
                let format = p.format.unwrap_or_else(|| OutputFormat::from_path(&p.source.output));
                Action::Process(Process { source: p.source.into_source(), met: p.met, format })
            },
            Commands::Grid(g) => {
                let format = g.format.unwrap_or_else(|| OutputFormat::from_path(&g.source.output));
                let spec = match g.epoch {
                    Some(epoch) => GridSpec::years(epoch, g.years),
                    None => {
                        let epoch = NaiveDate::from_ymd_opt(GRID_EPOCH_YEAR, 1, 1).unwrap_or_default();
                        GridSpec::years(epoch, g.years)
                    },
                };
                Action::Grid(Grid { source: g.source.into_source(), spec, window: g.afternoon, format })
            },
            Commands::Seasonal(s) => {
                let (first_year, first_month) = s.first_month.unwrap_or((MONTHLY_FIRST_YEAR, 1));
                Action::Seasonal(Seasonal {
                    source: s.source.into_source(),
                    window: s.afternoon,
                    detrend_start: s.detrend_start,
                    min_count: s.min_count,
                    bins: MonthlyBins { first_year, first_month, months: s.months },
                })
            },
            Commands::Tanks(t) => Action::Tanks(Tanks { source: t.into_source() }),
        };
        Config { action }
    }
}
