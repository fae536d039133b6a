// Zazzeri humidity correction for the δ13C channel, dry = raw / (A*h2o + B)
pub const H2O_CORR_A: f64 = -0.0109;
pub const H2O_CORR_B: f64 = 1.0023;

// 13C/12C of the VPDB standard (Brandt et al. 2010)
pub const VPDB_RATIO: f64 = 0.0111802;
pub const VPDB_RATIO_STDEV: f64 = 0.000016;

// CH4 output scale conversion
pub const CH4_SCALE_FACTOR: f64 = 1.00028;

/// Nearest-neighbour matches further away than this (seconds) are discarded.
pub const MATCH_TOLERANCE_SECS: i64 = 1200;

pub const SLOT_MINUTES: u32 = 20;
pub const GRID_EPOCH_YEAR: i32 = 2018;
pub const GRID_YEARS: i32 = 3;

pub const MONTHLY_FIRST_YEAR: i32 = 2018;
pub const MONTHLY_MONTHS: usize = 48;
pub const MIN_MONTHLY_COUNT: usize = 3;

pub const AFTERNOON_START_HOUR: u32 = 13;
pub const AFTERNOON_END_HOUR: u32 = 17;

pub const AMBIENT_TAG: &str = "air";
// 15/1/2018 - 17/4/2019 and 17/4/2019 onwards, in matching order
pub const TANK_SERIALS: [&str; 4] = ["D671527", "D671528", "D334212", "D334213"];

pub const GCWERKS_HEADER_LINES: usize = 2;
pub const GCWERKS_DATE_FMT: &str = "%y%m%d";
pub const GCWERKS_TIME_FMT: &str = "%H%M";
pub const MET_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
