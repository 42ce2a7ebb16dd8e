use tracing::debug;

use super::error::{CalcError, CalcResult};
use super::types::{CumulativeTotal, Schedule, ScheduleEntry, periodic_rate, round_cents};

// Absorbs floating noise when the shortened term is an exact integer.
const TERM_TOLERANCE: f64 = 1e-9;

pub fn compute_payment(principal: f64, term_months: u32, annual_rate: f64) -> f64 {
    if !valid_loan(principal, term_months, annual_rate) {
        return 0.0;
    }

    let rate = periodic_rate(annual_rate);
    if rate == 0.0 {
        return principal / term_months as f64;
    }

    principal * rate / (1.0 - (1.0 + rate).powf(-(term_months as f64)))
}

pub fn generate_schedule(principal: f64, term_months: u32, annual_rate: f64) -> Schedule {
    let payment = compute_payment(principal, term_months, annual_rate);
    if payment <= 0.0 {
        return Vec::new();
    }

    let rate = periodic_rate(annual_rate);
    let mut balance = principal;
    (1..=term_months)
        .map(|month| {
            let interest = balance * rate;
            let principal_paid = payment - interest;
            let entry = schedule_entry(month, payment, interest, principal_paid, balance);
            balance -= principal_paid;
            entry
        })
        .collect()
}

// An empty result means the prepayment cleared the loan.
pub fn apply_prepayment(
    schedule: &[ScheduleEntry],
    extra: f64,
    annual_rate: f64,
) -> CalcResult<Schedule> {
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(CalcError::InvalidInput {
            field: "annual_rate",
            reason: "must be >= 0".to_string(),
        });
    }
    let Some(first) = schedule.first() else {
        return Ok(Vec::new());
    };
    if !extra.is_finite() {
        return Err(CalcError::NonFinite("prepayment"));
    }
    if extra <= 0.0 {
        return Ok(schedule.to_vec());
    }

    let reduced = first.remaining - extra;
    if reduced <= 0.0 {
        return Ok(Vec::new());
    }

    let payment = first.payment;
    let rate = periodic_rate(annual_rate);
    let term = shortened_term(reduced, payment, rate)?;
    Ok(amortize_at_payment(reduced, payment, rate, term))
}

pub fn project_with_prepayment(
    schedule: &[ScheduleEntry],
    extra: f64,
    annual_rate: f64,
) -> CalcResult<Vec<CumulativeTotal>> {
    if !extra.is_finite() {
        return Err(CalcError::NonFinite("prepayment"));
    }
    if extra <= 0.0 {
        return Ok(accumulate(schedule));
    }

    let mut totals = Vec::with_capacity(schedule.len());
    let mut running = CumulativeTotal::default();
    let mut current: Schedule = schedule.to_vec();

    while let Some((entry, rest)) = current.split_first() {
        running.payments += entry.payment + extra;
        running.prepayments += extra;
        running.interest += entry.interest;
        running.months += 1;
        totals.push(running);

        current = apply_prepayment(rest, extra, annual_rate)?;
    }

    debug!(
        months = running.months,
        scheduled_months = schedule.len(),
        extra,
        "prepayment projection finished"
    );
    Ok(totals)
}

fn accumulate(schedule: &[ScheduleEntry]) -> Vec<CumulativeTotal> {
    schedule
        .iter()
        .scan(CumulativeTotal::default(), |running, entry| {
            running.payments += entry.payment;
            running.interest += entry.interest;
            running.months += 1;
            Some(*running)
        })
        .collect()
}

fn shortened_term(principal: f64, payment: f64, rate: f64) -> CalcResult<u32> {
    if !payment.is_finite() || payment <= 0.0 {
        return Err(CalcError::InfeasiblePrepayment { principal, payment });
    }

    let periods = if rate == 0.0 {
        principal / payment
    } else {
        let coverage = principal * rate / payment;
        if coverage >= 1.0 {
            return Err(CalcError::InfeasiblePrepayment { principal, payment });
        }
        -(1.0 - coverage).ln() / rate.ln_1p()
    };

    if !periods.is_finite() {
        return Err(CalcError::NonFinite("term"));
    }
    if periods > u32::MAX as f64 {
        return Err(CalcError::InfeasiblePrepayment { principal, payment });
    }

    Ok((periods - TERM_TOLERANCE).ceil().max(1.0) as u32)
}

fn amortize_at_payment(principal: f64, payment: f64, rate: f64, term: u32) -> Schedule {
    let mut balance = principal;
    let mut schedule = Vec::with_capacity(term as usize);

    for month in 1..=term {
        let interest = balance * rate;
        let (paid, principal_paid) = if month == term {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        schedule.push(schedule_entry(month, paid, interest, principal_paid, balance));
        balance -= principal_paid;
    }

    schedule
}

fn schedule_entry(
    month: u32,
    payment: f64,
    interest: f64,
    principal_paid: f64,
    balance: f64,
) -> ScheduleEntry {
    ScheduleEntry {
        month,
        payment: round_cents(payment),
        interest: round_cents(interest),
        principal: round_cents(principal_paid),
        remaining: round_cents(balance),
    }
}

fn valid_loan(principal: f64, term_months: u32, annual_rate: f64) -> bool {
    term_months > 0
        && principal.is_finite()
        && principal > 0.0
        && annual_rate.is_finite()
        && annual_rate >= 0.0
}
