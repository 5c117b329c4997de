//! Library side of the `orghealth` command: configuration loading, table
//! preparation and logging setup.

pub mod config;
pub mod logging;
pub mod pipeline;
