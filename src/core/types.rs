use serde::{Deserialize, Serialize};

pub const PERIODS_PER_YEAR: u32 = 12;

/// `remaining` is the outstanding balance before this month's payment is
/// applied. Field names are the export format and must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub remaining: f64,
}

impl ScheduleEntry {
    pub fn remaining_after(&self) -> f64 {
        round_cents(self.remaining - self.principal)
    }
}

pub type Schedule = Vec<ScheduleEntry>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeTotal {
    pub payments: f64,
    pub prepayments: f64,
    pub interest: f64,
    pub months: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSnapshot {
    pub period: u32,
    pub balance: f64,
    pub total_invested: f64,
    pub total_gains: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProjection {
    pub final_balance: f64,
    pub total_invested: f64,
    pub total_gains: f64,
    pub total_return_percent: Option<f64>,
    pub periods: Vec<InvestmentSnapshot>,
    pub yearly: Vec<InvestmentSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanInputs {
    pub principal: f64,
    pub term_months: u32,
    pub annual_rate: f64,
    pub extra_payment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentInputs {
    pub initial_amount: f64,
    pub periodic_contribution: f64,
    pub annual_rate: f64,
    pub total_periods: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaymentSavings {
    pub interest_saved: f64,
    pub months_saved: u32,
    pub years_saved: f64,
    pub total_cost_saved: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaymentComparison {
    pub monthly_payment: f64,
    pub schedule: Schedule,
    pub without_prepayment: Vec<CumulativeTotal>,
    pub with_prepayment: Vec<CumulativeTotal>,
    pub savings: PrepaymentSavings,
}

impl PrepaymentComparison {
    pub fn final_without(&self) -> CumulativeTotal {
        self.without_prepayment.last().copied().unwrap_or_default()
    }

    pub fn final_with(&self) -> CumulativeTotal {
        self.with_prepayment.last().copied().unwrap_or_default()
    }
}

pub(crate) fn periodic_rate(annual_rate: f64) -> f64 {
    annual_rate / 100.0 / PERIODS_PER_YEAR as f64
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round_units(value: f64) -> f64 {
    value.round()
}
