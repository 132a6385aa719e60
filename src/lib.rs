pub mod config;
pub mod observability;
pub mod pipeline;
pub mod tasks;
pub mod transport;
