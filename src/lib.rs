pub mod cli;
pub mod config;
pub mod history;
pub mod model;
pub mod payload;
pub mod presenter;
