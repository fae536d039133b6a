use glob::glob;
use serde::Serialize;
use std::path::PathBuf;

use tracegas_core::data_formats::meteodata::{read_meteo_csv, MeteoData, MeteoLayout};
use tracegas_core::detrend::DetrendError;
use tracegas_core::error::{ParseError, WriteError};
use tracegas_core::gastype::GasType;
use tracegas_core::grid::GridSpec;
use tracegas_core::monthly::{MonthlyAggregate, MonthlyBins};
use tracegas_core::output::{write_json, write_table, OutputFormat};
use tracegas_core::pipeline::{Pipeline, Processed};
use tracegas_core::series::HourWindow;
use tracegas_core::species::SpeciesConfig;
use tracegas_core::stats::{BoxStats, LinReg};
use tracegas_core::tanks::{summarize, TankSummary};

/* =================== Public configuration types =================== */

#[derive(Debug)]
pub struct Config {
    pub action: Action,
}

#[derive(Debug, Clone)]
pub enum Action {
    Process(Process),
    Grid(Grid),
    Seasonal(Seasonal),
    Tanks(Tanks),
}

/// Input file and species settings shared by every action.
#[derive(Debug, Clone)]
pub struct Source {
    pub gas: GasType,
    pub input: PathBuf,
    pub output: PathBuf,
    pub species_config: Option<PathBuf>,
    pub no_correction: bool,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub source: Source,
    pub met: Vec<String>,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct Grid {
    pub source: Source,
    pub spec: GridSpec,
    pub window: HourWindow,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct Seasonal {
    pub source: Source,
    pub window: HourWindow,
    pub detrend_start: usize,
    pub min_count: usize,
    pub bins: MonthlyBins,
}

#[derive(Debug, Clone)]
pub struct Tanks {
    pub source: Source,
}

/* =================== Error type (no process::exit) =================== */

#[derive(thiserror::Error, Debug)]
pub enum CmdError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("write error: {0}")]
    Write(#[from] WriteError),
    #[error("detrend failed: {0}")]
    Detrend(#[from] DetrendError),
    #[error("{0}")]
    Msg(String),
}

/* =================== Reports =================== */

#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub buckets: Vec<Vec<f64>>,
    pub summaries: Vec<Option<BoxStats>>,
}

impl MonthlyReport {
    fn new(agg: MonthlyAggregate, min_count: usize) -> Self {
        let summaries = agg.summaries(min_count);
        Self { buckets: agg.buckets, summaries }
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonalReport {
    pub gas: GasType,
    pub window: String,
    pub detrend_start: usize,
    pub records: usize,
    pub month_starts: Vec<chrono::NaiveDate>,
    pub conc_fit: LinReg,
    pub delta_fit: LinReg,
    pub conc: MonthlyReport,
    pub delta: MonthlyReport,
}

#[derive(Debug, Serialize)]
pub struct TanksReport {
    pub gas: GasType,
    pub ambient: usize,
    pub dropped: usize,
    pub tanks: Vec<TankSummary>,
}

/* =================== Entry point =================== */

impl Config {
    pub fn run(&self) -> Result<(), CmdError> {
        match &self.action {
            Action::Process(p) => run_process(p),
            Action::Grid(g) => run_grid(g),
            Action::Seasonal(s) => run_seasonal(s),
            Action::Tanks(t) => run_tanks(t),
        }
    }
}

/* =================== Actions =================== */

impl Source {
    pub fn species(&self) -> Result<SpeciesConfig, CmdError> {
        let mut species = match &self.species_config {
            Some(path) => SpeciesConfig::from_json_file(path).map_err(|e| {
                CmdError::Msg(format!("Failed to read species config {}: {}", path.display(), e))
            })?,
            None => SpeciesConfig::for_gas(self.gas),
        };
        if self.no_correction {
            species.humidity_correction = None;
        }
        Ok(species)
    }

    fn load(&self) -> Result<(Pipeline, Processed), CmdError> {
        let pipeline = Pipeline::new(self.species()?);
        let processed = pipeline.process_file(&self.input)?;
        if processed.series.is_empty() {
            log::warn!("No ambient records in {}", self.input.display());
        }
        Ok((pipeline, processed))
    }
}

fn run_process(p: &Process) -> Result<(), CmdError> {
    let (pipeline, processed) = p.source.load()?;
    let series = processed.series.scaled(pipeline.species.scale_factor);

    let met_files = resolve_inputs(&p.met);
    let table = if met_files.is_empty() {
        series.to_table()
    } else {
        let meteo = read_meteo_files(&met_files)?;
        pipeline.align(series, &meteo).to_table()
    };
    write_table(&table, &p.source.output, p.format)?;
    Ok(())
}

fn run_grid(g: &Grid) -> Result<(), CmdError> {
    let (pipeline, processed) = g.source.load()?;
    let series = processed.series.scaled(pipeline.species.scale_factor);
    let gridded = pipeline.grid(&series, g.spec);
    log::info!("{} of {} grid slots filled", gridded.filled(), g.spec.len());
    write_table(&gridded.to_table(&series, g.window), &g.source.output, g.format)?;
    Ok(())
}

fn run_seasonal(s: &Seasonal) -> Result<(), CmdError> {
    let (pipeline, processed) = s.source.load()?;
    let seasonal = pipeline.seasonal(&processed.series, s.window, s.detrend_start, s.bins)?;

    let report = SeasonalReport {
        gas: processed.series.gas,
        window: s.window.to_string(),
        detrend_start: s.detrend_start,
        records: seasonal.conc.values.len(),
        month_starts: seasonal.monthly_conc.month_starts.clone(),
        conc_fit: seasonal.conc.fit,
        delta_fit: seasonal.delta.fit,
        conc: MonthlyReport::new(seasonal.monthly_conc, s.min_count),
        delta: MonthlyReport::new(seasonal.monthly_delta, s.min_count),
    };
    write_json(&report, &s.source.output)?;
    Ok(())
}

fn run_tanks(t: &Tanks) -> Result<(), CmdError> {
    let (_, processed) = t.source.load()?;
    let report = TanksReport {
        gas: processed.series.gas,
        ambient: processed.series.len(),
        dropped: processed.partitions.dropped,
        tanks: summarize(&processed.partitions, &processed.series.records),
    };
    for tank in &report.tanks {
        log::info!("{}: {} runs", tank.serial, tank.count);
    }
    write_json(&report, &t.source.output)?;
    Ok(())
}

fn read_meteo_files(files: &[PathBuf]) -> Result<MeteoData, CmdError> {
    let layout = MeteoLayout::default();
    let mut meteo = MeteoData::default();
    for path in files {
        meteo.extend(read_meteo_csv(path, &layout)?);
    }
    meteo.sort();
    Ok(meteo)
}

/// Expand glob patterns, literal paths pass through.
pub fn resolve_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for inp in inputs {
        if inp.contains('*') || inp.contains('?') || inp.contains('[') {
            match glob(inp) {
                Ok(paths) => out.extend(paths.filter_map(Result::ok)),
                Err(e) => log::error!("Invalid glob '{}': {}", inp, e),
            }
        } else {
            out.push(PathBuf::from(inp));
        }
    }
    out
}
