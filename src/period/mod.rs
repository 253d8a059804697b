//! Day / evening / night period model.
//!
//! Survey periods are defined by three time-of-day anchors. Each period
//! runs from its own anchor up to the next one, so the three windows always
//! partition the 24-hour clock. Night usually wraps past midnight, and an
//! evening that starts together with the night is disabled.

mod clock;
mod times;

pub use clock::ClockTime;
pub use times::{Period, PeriodSelector, PeriodTimes};
