//! The four quote sources, one module per incompatible wire format.

pub mod binance;
pub mod minfin;
pub mod monobank;
pub mod privat;
pub mod util;

pub(crate) const USER_AGENT: &str = "ratewatch/1.0";
