pub mod manager;
pub mod metrics;
pub mod model;
pub mod store;
