#[macro_use]
mod macros;

pub mod cost;
pub mod energy;
pub mod percent;
pub mod rate;

/// Decimal places kept for stored energy and charge values.
pub const STORED_DECIMALS: u32 = 3;
