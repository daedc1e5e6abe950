//! Application module: configuration, command line and startup for `rpsq`

pub mod cli;
pub mod config;
pub mod startup;
