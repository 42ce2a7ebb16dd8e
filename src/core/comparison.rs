use super::amortization::{generate_schedule, project_with_prepayment};
use super::error::{CalcError, CalcResult};
use super::types::{
    CumulativeTotal, LoanInputs, PERIODS_PER_YEAR, PrepaymentComparison, PrepaymentSavings,
};

pub fn compare_prepayment(inputs: &LoanInputs) -> CalcResult<PrepaymentComparison> {
    validate_loan_inputs(inputs)?;

    let schedule = generate_schedule(inputs.principal, inputs.term_months, inputs.annual_rate);
    let Some(first) = schedule.first() else {
        return Err(CalcError::InvalidInput {
            field: "principal",
            reason: "does not produce a repayment schedule".to_string(),
        });
    };
    let monthly_payment = first.payment;

    let without_prepayment = project_with_prepayment(&schedule, 0.0, inputs.annual_rate)?;
    let with_prepayment =
        project_with_prepayment(&schedule, inputs.extra_payment, inputs.annual_rate)?;

    let savings = savings_between(&without_prepayment, &with_prepayment);

    Ok(PrepaymentComparison {
        monthly_payment,
        schedule,
        without_prepayment,
        with_prepayment,
        savings,
    })
}

fn savings_between(without: &[CumulativeTotal], with: &[CumulativeTotal]) -> PrepaymentSavings {
    let without = without.last().copied().unwrap_or_default();
    let with = with.last().copied().unwrap_or_default();
    let months_saved = without.months.saturating_sub(with.months);

    PrepaymentSavings {
        interest_saved: without.interest - with.interest,
        months_saved,
        // Shown to one decimal place.
        years_saved: (months_saved as f64 / PERIODS_PER_YEAR as f64 * 10.0).round() / 10.0,
        total_cost_saved: without.payments - with.payments,
    }
}

pub fn validate_loan_inputs(inputs: &LoanInputs) -> CalcResult<()> {
    if !inputs.principal.is_finite() || inputs.principal <= 0.0 {
        return Err(CalcError::InvalidInput {
            field: "principal",
            reason: "must be > 0".to_string(),
        });
    }
    if inputs.term_months == 0 {
        return Err(CalcError::InvalidInput {
            field: "term_months",
            reason: "must be > 0".to_string(),
        });
    }
    if !inputs.annual_rate.is_finite() || inputs.annual_rate < 0.0 {
        return Err(CalcError::InvalidInput {
            field: "annual_rate",
            reason: "must be >= 0".to_string(),
        });
    }
    if !inputs.extra_payment.is_finite() || inputs.extra_payment < 0.0 {
        return Err(CalcError::InvalidInput {
            field: "extra_payment",
            reason: "must be >= 0".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> LoanInputs {
        LoanInputs {
            principal: 111_000.0,
            term_months: 180,
            annual_rate: 5.0,
            extra_payment: 3_000.0,
        }
    }

    #[test]
    fn monthly_prepayment_saves_interest_and_time() {
        let comparison = compare_prepayment(&sample_inputs()).expect("valid inputs");
        let without = comparison.final_without();
        let with = comparison.final_with();

        assert_eq!(comparison.schedule.len(), 180);
        assert_eq!(without.months, 180);
        assert_eq!(with.months, 31);
        assert_eq!(comparison.savings.months_saved, 149);
        assert_approx(comparison.savings.years_saved, 12.4);
        assert_approx(comparison.savings.interest_saved, without.interest - with.interest);
        assert_approx(comparison.savings.total_cost_saved, without.payments - with.payments);
        assert!(comparison.savings.interest_saved > 0.0);
        assert_approx(comparison.monthly_payment, comparison.schedule[0].payment);
    }

    #[test]
    fn zero_extra_payment_saves_nothing() {
        let mut inputs = sample_inputs();
        inputs.extra_payment = 0.0;
        let comparison = compare_prepayment(&inputs).expect("valid inputs");

        assert_eq!(comparison.without_prepayment, comparison.with_prepayment);
        assert_eq!(comparison.savings.months_saved, 0);
        assert_eq!(comparison.savings.interest_saved, 0.0);
        assert_eq!(comparison.savings.total_cost_saved, 0.0);
    }

    #[test]
    fn rejects_invalid_loan_inputs() {
        let mut inputs = sample_inputs();
        inputs.term_months = 0;
        let err = compare_prepayment(&inputs).expect_err("zero term");
        assert!(err.to_string().contains("term_months"));

        let mut inputs = sample_inputs();
        inputs.annual_rate = -1.0;
        let err = compare_prepayment(&inputs).expect_err("negative rate");
        assert!(err.to_string().contains("annual_rate"));

        let mut inputs = sample_inputs();
        inputs.extra_payment = f64::INFINITY;
        assert!(compare_prepayment(&inputs).is_err());
    }
}
