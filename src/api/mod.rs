mod error;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use error::ApiError;

use crate::core::{
    CalcError, InvestmentInputs, InvestmentProjection, LoanInputs, PERIODS_PER_YEAR,
    PrepaymentComparison, compare_prepayment, project_investment_inputs, write_schedule,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    principal: Option<f64>,
    term_months: Option<u32>,
    term_years: Option<u32>,
    annual_rate: Option<f64>,
    extra_payment: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    initial_amount: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_rate: Option<f64>,
    periods: Option<u32>,
    years: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "prepay schedule",
    about = "Annuity loan schedule compared against a fixed monthly prepayment"
)]
struct LoanCli {
    #[arg(long, help = "Loan principal")]
    principal: f64,
    #[arg(long, default_value_t = 180, help = "Loan term in months")]
    term_months: u32,
    #[arg(long, help = "Annual percentage rate in percent, e.g. 4.2")]
    annual_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Extra amount prepaid on top of every monthly payment"
    )]
    extra_payment: f64,
    #[arg(long, help = "Write the original schedule to this JSON file")]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "prepay invest",
    about = "Compound growth of a monthly contribution"
)]
struct InvestmentCli {
    #[arg(long, default_value_t = 0.0)]
    initial_amount: f64,
    #[arg(long)]
    monthly_contribution: f64,
    #[arg(long, help = "Expected annual return in percent, e.g. 5")]
    annual_rate: f64,
    #[arg(long, default_value_t = 180, help = "Number of monthly periods")]
    periods: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanResponse {
    principal: f64,
    term_months: u32,
    annual_rate: f64,
    extra_payment: f64,
    #[serde(flatten)]
    comparison: PrepaymentComparison,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentResponse {
    initial_amount: f64,
    monthly_contribution: f64,
    annual_rate: f64,
    #[serde(flatten)]
    projection: InvestmentProjection,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_loan_inputs(cli: &LoanCli) -> Result<LoanInputs, ApiError> {
    if !cli.principal.is_finite() || cli.principal <= 0.0 {
        return Err(invalid("--principal must be > 0"));
    }

    if cli.term_months == 0 {
        return Err(invalid("--term-months must be > 0"));
    }

    if !cli.annual_rate.is_finite() || cli.annual_rate < 0.0 {
        return Err(invalid("--annual-rate must be >= 0"));
    }

    if !cli.extra_payment.is_finite() || cli.extra_payment < 0.0 {
        return Err(invalid("--extra-payment must be >= 0"));
    }

    Ok(LoanInputs {
        principal: cli.principal,
        term_months: cli.term_months,
        annual_rate: cli.annual_rate,
        extra_payment: cli.extra_payment,
    })
}

fn build_investment_inputs(cli: &InvestmentCli) -> Result<InvestmentInputs, ApiError> {
    if !cli.initial_amount.is_finite() || cli.initial_amount < 0.0 {
        return Err(invalid("--initial-amount must be >= 0"));
    }

    if !cli.monthly_contribution.is_finite() || cli.monthly_contribution < 0.0 {
        return Err(invalid("--monthly-contribution must be >= 0"));
    }

    if !cli.annual_rate.is_finite() || cli.annual_rate <= -100.0 * PERIODS_PER_YEAR as f64 {
        return Err(invalid("--annual-rate must be > -1200"));
    }

    if cli.periods == 0 {
        return Err(invalid("--periods must be > 0"));
    }

    Ok(InvestmentInputs {
        initial_amount: cli.initial_amount,
        periodic_contribution: cli.monthly_contribution,
        annual_rate: cli.annual_rate,
        total_periods: cli.periods,
    })
}

fn invalid(msg: &str) -> ApiError {
    ApiError::InvalidParameter(msg.to_string())
}

pub fn run_schedule_command(args: &[String]) -> Result<String, ApiError> {
    let cli = LoanCli::try_parse_from(args)?;
    let inputs = build_loan_inputs(&cli)?;
    let comparison = compare_prepayment(&inputs)?;

    if let Some(path) = &cli.output {
        write_schedule(path, &comparison.schedule)?;
        info!(path = %path.display(), months = comparison.schedule.len(), "schedule written");
    }

    let response = build_loan_response(&inputs, comparison);
    Ok(serde_json::to_string_pretty(&response).map_err(CalcError::from)?)
}

pub fn run_investment_command(args: &[String]) -> Result<String, ApiError> {
    let cli = InvestmentCli::try_parse_from(args)?;
    let inputs = build_investment_inputs(&cli)?;
    let projection = project_investment_inputs(&inputs)?;
    let response = build_investment_response(&inputs, projection);
    Ok(serde_json::to_string_pretty(&response).map_err(CalcError::from)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "prepay HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/api/loan");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/api/loan", get(loan_get_handler).post(loan_post_handler))
        .route(
            "/api/investment",
            get(investment_get_handler).post(investment_post_handler),
        )
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn loan_get_handler(Query(payload): Query<LoanPayload>) -> Response {
    loan_handler_impl(payload).await
}

async fn loan_post_handler(Json(payload): Json<LoanPayload>) -> Response {
    loan_handler_impl(payload).await
}

async fn investment_get_handler(Query(payload): Query<InvestmentPayload>) -> Response {
    investment_handler_impl(payload).await
}

async fn investment_post_handler(Json(payload): Json<InvestmentPayload>) -> Response {
    investment_handler_impl(payload).await
}

async fn loan_handler_impl(payload: LoanPayload) -> Response {
    let result = loan_inputs_from_payload(payload).and_then(|inputs| {
        let comparison = compare_prepayment(&inputs)?;
        Ok(build_loan_response(&inputs, comparison))
    });

    match result {
        Ok(response) => {
            info!(
                months_with = response.comparison.final_with().months,
                months_without = response.comparison.final_without().months,
                "loan comparison served"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(error = %err, "loan request rejected");
            err.into_response()
        }
    }
}

async fn investment_handler_impl(payload: InvestmentPayload) -> Response {
    let result = investment_inputs_from_payload(payload).and_then(|inputs| {
        let projection = project_investment_inputs(&inputs)?;
        Ok(build_investment_response(&inputs, projection))
    });

    match result {
        Ok(response) => {
            info!(
                periods = response.projection.periods.len(),
                "investment projection served"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(error = %err, "investment request rejected");
            err.into_response()
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn loan_inputs_from_json(json: &str) -> Result<LoanInputs, ApiError> {
    let payload = serde_json::from_str::<LoanPayload>(json)?;
    loan_inputs_from_payload(payload)
}

#[cfg(test)]
fn investment_inputs_from_json(json: &str) -> Result<InvestmentInputs, ApiError> {
    let payload = serde_json::from_str::<InvestmentPayload>(json)?;
    investment_inputs_from_payload(payload)
}

fn loan_inputs_from_payload(payload: LoanPayload) -> Result<LoanInputs, ApiError> {
    let mut cli = default_loan_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(years) = payload.term_years {
        cli.term_months = years
            .checked_mul(PERIODS_PER_YEAR)
            .ok_or_else(|| invalid("--term-years is too large"))?;
    }
    if let Some(v) = payload.term_months {
        cli.term_months = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.extra_payment {
        cli.extra_payment = v;
    }

    build_loan_inputs(&cli)
}

fn investment_inputs_from_payload(
    payload: InvestmentPayload,
) -> Result<InvestmentInputs, ApiError> {
    let mut cli = default_investment_cli_for_api();

    if let Some(v) = payload.initial_amount {
        cli.initial_amount = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(years) = payload.years {
        cli.periods = years
            .checked_mul(PERIODS_PER_YEAR)
            .ok_or_else(|| invalid("--years is too large"))?;
    }
    if let Some(v) = payload.periods {
        cli.periods = v;
    }

    build_investment_inputs(&cli)
}

fn default_loan_cli_for_api() -> LoanCli {
    LoanCli {
        principal: 111_000.0,
        term_months: 180,
        annual_rate: 5.0,
        extra_payment: 3_000.0,
        output: None,
    }
}

fn default_investment_cli_for_api() -> InvestmentCli {
    InvestmentCli {
        initial_amount: 0.0,
        monthly_contribution: 3_000.0,
        annual_rate: 5.0,
        periods: 180,
    }
}

fn build_loan_response(inputs: &LoanInputs, comparison: PrepaymentComparison) -> LoanResponse {
    LoanResponse {
        principal: inputs.principal,
        term_months: inputs.term_months,
        annual_rate: inputs.annual_rate,
        extra_payment: inputs.extra_payment,
        comparison,
    }
}

fn build_investment_response(
    inputs: &InvestmentInputs,
    projection: InvestmentProjection,
) -> InvestmentResponse {
    InvestmentResponse {
        initial_amount: inputs.initial_amount,
        monthly_contribution: inputs.periodic_contribution,
        annual_rate: inputs.annual_rate,
        projection,
    }
}
