//! Common value types

pub mod address;
pub mod errors;
pub mod ratio;
pub mod units;
pub mod wide;
