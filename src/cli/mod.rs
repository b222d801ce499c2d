//! Command drivers and terminal presentation. Everything here sits outside
//! the aggregation core: it invokes one entry point and renders the result.

pub mod rates;
pub mod spike;
pub mod ui;
