pub mod gcwerks;
pub mod meteodata;
