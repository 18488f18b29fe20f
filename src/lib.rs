pub mod activity;
pub mod config;
pub mod error;
pub mod generator;
pub mod lang;
pub mod logging;
pub mod metrics;
pub mod plan;
pub mod state;
