//! Export Google contacts into one CSV file per contact label.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod grouping;
pub mod people_api;
pub mod types;
