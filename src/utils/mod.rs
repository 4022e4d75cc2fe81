pub mod serde_str;
pub mod time;
pub mod units;
