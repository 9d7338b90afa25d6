pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod feed;
pub mod model;
pub mod state;
