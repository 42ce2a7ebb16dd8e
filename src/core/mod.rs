mod amortization;
mod comparison;
mod error;
mod export;
mod investment;
mod types;

pub use amortization::{
    apply_prepayment, compute_payment, generate_schedule, project_with_prepayment,
};
pub use comparison::{compare_prepayment, validate_loan_inputs};
pub use error::{CalcError, CalcResult};
pub use export::{read_schedule, schedule_from_json, schedule_to_json, write_schedule};
pub use investment::{project_investment, project_investment_inputs};
pub use types::{
    CumulativeTotal, InvestmentInputs, InvestmentProjection, InvestmentSnapshot, LoanInputs,
    PERIODS_PER_YEAR, PrepaymentComparison, PrepaymentSavings, Schedule, ScheduleEntry,
};
