pub mod config;
pub mod enhance;
pub mod generate;
pub mod serve;
