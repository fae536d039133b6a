pub mod boxstats;
pub mod linreg;

pub use boxstats::BoxStats;
pub use linreg::LinReg;
