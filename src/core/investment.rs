use super::error::{CalcError, CalcResult};
use super::types::{
    InvestmentInputs, InvestmentProjection, InvestmentSnapshot, PERIODS_PER_YEAR, periodic_rate,
    round_units,
};

pub fn project_investment(
    initial_amount: f64,
    periodic_contribution: f64,
    annual_rate: f64,
    total_periods: u32,
) -> CalcResult<InvestmentProjection> {
    if total_periods == 0 {
        return Err(CalcError::InvalidPeriods);
    }
    for (field, value) in [
        ("initial_amount", initial_amount),
        ("periodic_contribution", periodic_contribution),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CalcError::InvalidInput {
                field,
                reason: "must be >= 0".to_string(),
            });
        }
    }
    if !annual_rate.is_finite() {
        return Err(CalcError::NonFinite("annual_rate"));
    }
    // A periodic rate at or below -100% wipes out or flips the balance.
    if annual_rate <= -100.0 * PERIODS_PER_YEAR as f64 {
        return Err(CalcError::InvalidInput {
            field: "annual_rate",
            reason: "must be > -1200".to_string(),
        });
    }

    let growth = 1.0 + periodic_rate(annual_rate);
    let mut balance = initial_amount;
    let mut invested = initial_amount;
    let mut periods = Vec::with_capacity(total_periods as usize);

    for period in 1..=total_periods {
        // Deposit first, so the contribution grows in the same period.
        balance += periodic_contribution;
        invested += periodic_contribution;
        balance *= growth;

        periods.push(InvestmentSnapshot {
            period,
            balance: round_units(balance),
            total_invested: round_units(invested),
            total_gains: round_units(balance - invested),
        });
    }

    let yearly = periods
        .iter()
        .filter(|snapshot| snapshot.period % PERIODS_PER_YEAR == 0)
        .copied()
        .collect();
    let total_return_percent = (invested > 0.0).then(|| (balance / invested - 1.0) * 100.0);

    Ok(InvestmentProjection {
        final_balance: balance,
        total_invested: invested,
        total_gains: balance - invested,
        total_return_percent,
        periods,
        yearly,
    })
}

pub fn project_investment_inputs(inputs: &InvestmentInputs) -> CalcResult<InvestmentProjection> {
    project_investment(
        inputs.initial_amount,
        inputs.periodic_contribution,
        inputs.annual_rate,
        inputs.total_periods,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_rate_contributions_only() {
        let projection = project_investment(0.0, 1_000.0, 0.0, 10).expect("valid");

        assert_eq!(projection.final_balance, 10_000.0);
        assert_eq!(projection.total_invested, 10_000.0);
        assert_eq!(projection.total_gains, 0.0);
        assert_eq!(projection.total_return_percent, Some(0.0));
        assert_eq!(projection.periods.len(), 10);
        assert!(projection.yearly.is_empty());
    }

    #[test]
    fn contribution_grows_in_the_period_it_is_deposited() {
        // 12% a year is 1% a month: (100 * 1.01 + 100) * 1.01 = 203.01
        let projection = project_investment(0.0, 100.0, 12.0, 2).expect("valid");

        assert_approx(projection.final_balance, 203.01);
        assert_approx(projection.total_invested, 200.0);
        assert_approx(projection.total_gains, 3.01);
        assert_eq!(projection.periods[0].balance, 101.0);
        assert_eq!(projection.periods[1].balance, 203.0);
        assert_eq!(projection.periods[1].total_gains, 3.0);
    }

    #[test]
    fn initial_amount_counts_as_invested() {
        let projection = project_investment(5_000.0, 0.0, 12.0, 1).expect("valid");

        assert_approx(projection.final_balance, 5_050.0);
        assert_approx(projection.total_invested, 5_000.0);
        let total_return = projection.total_return_percent.expect("invested > 0");
        assert_approx(total_return, 1.0);
    }

    #[test]
    fn yearly_rollup_keeps_every_twelfth_period() {
        let projection = project_investment(0.0, 3_000.0, 5.0, 180).expect("valid");

        assert_eq!(projection.periods.len(), 180);
        assert_eq!(projection.yearly.len(), 15);
        for (idx, snapshot) in projection.yearly.iter().enumerate() {
            assert_eq!(snapshot.period, (idx as u32 + 1) * 12);
        }
        let last = projection.yearly.last().expect("non-empty");
        assert_eq!(last.balance, projection.final_balance.round());
        assert!(projection.final_balance > projection.total_invested);
    }

    #[test]
    fn nothing_invested_has_no_return_percentage() {
        let projection = project_investment(0.0, 0.0, 5.0, 12).expect("valid");
        assert_eq!(projection.final_balance, 0.0);
        assert_eq!(projection.total_return_percent, None);
    }

    #[test]
    fn negative_rate_reports_losses() {
        let projection = project_investment(1_000.0, 100.0, -12.0, 12).expect("valid");
        assert!(projection.total_gains < 0.0);
        assert!(projection.total_return_percent.expect("invested > 0") < 0.0);
    }

    #[test]
    fn rejects_rates_that_wipe_out_the_balance() {
        for rate in [-1_200.0, -1_500.0] {
            assert!(matches!(
                project_investment(1_000.0, 100.0, rate, 12),
                Err(CalcError::InvalidInput {
                    field: "annual_rate",
                    ..
                })
            ));
        }
        assert!(project_investment(1_000.0, 100.0, -1_199.0, 12).is_ok());
    }

    #[test]
    fn rejects_empty_horizon_and_negative_amounts() {
        assert!(matches!(
            project_investment(0.0, 100.0, 5.0, 0),
            Err(CalcError::InvalidPeriods)
        ));
        assert!(matches!(
            project_investment(-1.0, 100.0, 5.0, 12),
            Err(CalcError::InvalidInput {
                field: "initial_amount",
                ..
            })
        ));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_zero_rate_balance_is_sum_of_deposits(
            initial in 0u32..1_000_000,
            contribution in 0u32..50_000,
            periods in 1u32..600
        ) {
            let projection = project_investment(initial as f64, contribution as f64, 0.0, periods)
                .expect("valid");
            let expected = initial as f64 + contribution as f64 * periods as f64;

            prop_assert_eq!(projection.final_balance, expected);
            prop_assert_eq!(projection.total_invested, expected);
            prop_assert_eq!(projection.total_gains, 0.0);
            prop_assert_eq!(projection.periods.len(), periods as usize);
            prop_assert_eq!(projection.yearly.len(), (periods / 12) as usize);
        }

        #[test]
        fn prop_positive_rate_balance_is_non_decreasing(
            initial in 0u32..100_000,
            contribution in 0u32..10_000,
            rate_bp in 0u32..2_000,
            periods in 1u32..360
        ) {
            let projection = project_investment(
                initial as f64,
                contribution as f64,
                rate_bp as f64 / 100.0,
                periods,
            )
            .expect("valid");

            for pair in projection.periods.windows(2) {
                prop_assert!(pair[1].balance >= pair[0].balance);
                prop_assert!(pair[1].total_invested >= pair[0].total_invested);
            }
            prop_assert!(projection.total_gains >= -1e-6);
        }
    }
}
