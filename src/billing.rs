mod calculator;
mod period;
mod stats;

pub use self::{
    calculator::BillingCalculator,
    period::{BillingPeriod, BillingPeriods},
    stats::{BillingPeriodStats, BillingReport, DailyData},
};
