pub mod align;
pub mod classify;
pub mod constants;
pub mod data_formats;
pub mod detrend;
pub mod error;
pub mod gastype;
pub mod grid;
pub mod isotope;
pub mod monthly;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod series;
pub mod species;
pub mod stats;
pub mod tanks;
pub mod utils;
