pub mod config;
pub mod proximity;
pub mod simulate;
pub mod wheel;
