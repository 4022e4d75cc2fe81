pub mod actions;
pub mod config;
pub mod notify;
pub mod pool;
pub mod selection;
pub mod tokens;
pub mod totals;
pub mod utils;
