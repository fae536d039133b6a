use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub struct ParseGasError(String);

impl fmt::Display for ParseGasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for ParseGasError {}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasType {
    #[default]
    CH4,
    CO2,
}

impl fmt::Display for GasType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GasType::CH4 => write!(f, "CH4"),
            GasType::CO2 => write!(f, "CO2"),
        }
    }
}

impl FromStr for GasType {
    type Err = ParseGasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ch4" => Ok(GasType::CH4),
            "co2" => Ok(GasType::CO2),
            other => Err(ParseGasError(format!("Invalid gas: {other}"))),
        }
    }
}

impl GasType {
    pub fn column_name(&self) -> &'static str {
        match self {
            GasType::CH4 => "ch4",
            GasType::CO2 => "co2",
        }
    }
    pub fn stdev_col(&self) -> String {
        format!("{}_stdev", self.column_name())
    }
    /// δ13C column, e.g. `d13ch4`
    pub fn delta_col(&self) -> String {
        format!("d13{}", self.column_name())
    }
    pub fn delta_stdev_col(&self) -> String {
        format!("d13{}_stdev", self.column_name())
    }
}
