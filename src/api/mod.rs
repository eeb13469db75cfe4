use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    CheckingAccountInputs, ComparisonReport, ComparisonState, GlobalInputs, LowRiskInputs,
    RealEstateInputs, RentalTaxTrack, StockMarketInputs, TaxBracket, VehicleResult, VehicleType,
    project, run_comparison,
};

/// Longest horizon accepted from callers; the break-even search re-projects
/// every year up to this bound.
const MAX_YEARS: u32 = 100;
const MAX_MORTGAGE_YEARS: u32 = 50;

#[derive(Parser, Debug)]
#[command(
    name = "invest-compare",
    about = "Compare stock market, cash, low-risk fund and leveraged real estate over a shared horizon"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run a comparison for a JSON scenario and print the report.
    Compare {
        #[arg(long, help = "Scenario JSON file; reads stdin when omitted")]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Invalid API JSON payload: {0}")]
    Json(String),
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be > -100")]
    BelowTotalLoss { field: &'static str },
    #[error("{field} net of the management fee must be > -100")]
    NetOfFeeBelowTotalLoss { field: &'static str },
    #[error("unknown investment type: {0}")]
    UnknownVehicle(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiVehicle {
    #[serde(alias = "stockMarket", alias = "stock_market", alias = "stocks")]
    StockMarket,
    #[serde(alias = "checkingAccount", alias = "checking_account", alias = "checking")]
    CheckingAccount,
    #[serde(alias = "lowRisk", alias = "low_risk")]
    LowRisk,
    #[serde(alias = "realEstate", alias = "real_estate")]
    RealEstate,
}

impl From<ApiVehicle> for VehicleType {
    fn from(value: ApiVehicle) -> Self {
        match value {
            ApiVehicle::StockMarket => VehicleType::StockMarket,
            ApiVehicle::CheckingAccount => VehicleType::CheckingAccount,
            ApiVehicle::LowRisk => VehicleType::LowRisk,
            ApiVehicle::RealEstate => VehicleType::RealEstate,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GlobalPayload {
    inflation_rate: Option<f64>,
    years: Option<u32>,
    tax_bracket: Option<TaxBracket>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct StockPayload {
    initial_investment: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_return: Option<f64>,
    management_fee_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct LowRiskPayload {
    initial_investment: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_return: Option<f64>,
    management_fee_percent: Option<f64>,
    #[serde(alias = "isCPILinked")]
    is_cpi_linked: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct CheckingAccountPayload {
    amount: Option<f64>,
    annual_interest: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct RealEstatePayload {
    apartment_price: Option<f64>,
    mortgage_percent: Option<f64>,
    mortgage_years: Option<u32>,
    mortgage_interest_rate: Option<f64>,
    cpi_linked_percent: Option<f64>,
    cpi_linked_interest_rate: Option<f64>,
    cpi_linked_years: Option<u32>,
    annual_appreciation: Option<f64>,
    monthly_rent: Option<f64>,
    annual_rent_increase: Option<f64>,
    vacancy_rate_percent: Option<f64>,
    annual_maintenance_cost: Option<f64>,
    is_first_apartment: Option<bool>,
    lawyer_and_agent_percent: Option<f64>,
    rental_tax_track: Option<RentalTaxTrack>,
    renovation_cost: Option<f64>,
    annual_insurance: Option<f64>,
}

/// Scenario payload. Every field is optional and overlays the default
/// scenario.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    global_inputs: GlobalPayload,
    active_investments: Option<Vec<ApiVehicle>>,
    stock_market: StockPayload,
    checking_account: CheckingAccountPayload,
    low_risk: LowRiskPayload,
    real_estate: RealEstatePayload,
}

/// Flat query-string form of the scenario for `GET /api/compare`. Vehicle
/// sections keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CompareQuery {
    inflation_rate: Option<f64>,
    years: Option<u32>,
    tax_bracket: Option<TaxBracket>,
    /// Comma-separated list, e.g. `stockMarket,realEstate`.
    active: Option<String>,
}

impl CompareQuery {
    fn into_payload(self) -> Result<ComparePayload, InputError> {
        let active_investments = match self.active {
            Some(list) => Some(
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(parse_vehicle)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        Ok(ComparePayload {
            global_inputs: GlobalPayload {
                inflation_rate: self.inflation_rate,
                years: self.years,
                tax_bracket: self.tax_bracket,
            },
            active_investments,
            ..ComparePayload::default()
        })
    }
}

fn parse_vehicle(name: &str) -> Result<ApiVehicle, InputError> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| InputError::UnknownVehicle(name.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectPayload {
    vehicle: ApiVehicle,
    #[serde(flatten)]
    scenario: ComparePayload,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn state_from_json(json: &str) -> Result<ComparisonState, InputError> {
    let payload = serde_json::from_str::<ComparePayload>(json)
        .map_err(|e| InputError::Json(e.to_string()))?;
    state_from_payload(payload)
}

fn state_from_payload(payload: ComparePayload) -> Result<ComparisonState, InputError> {
    let mut state = default_state_for_api();

    let g = payload.global_inputs;
    if let Some(v) = g.inflation_rate {
        state.global_inputs.inflation_rate = v;
    }
    if let Some(v) = g.years {
        state.global_inputs.years = v;
    }
    if let Some(v) = g.tax_bracket {
        state.global_inputs.tax_bracket = v;
    }

    if let Some(active) = payload.active_investments {
        let mut vehicles: Vec<VehicleType> = active.into_iter().map(Into::into).collect();
        vehicles.sort();
        vehicles.dedup();
        state.active_investments = vehicles;
    }

    let s = payload.stock_market;
    if let Some(v) = s.initial_investment {
        state.stock_market.initial_investment = v;
    }
    if let Some(v) = s.monthly_contribution {
        state.stock_market.monthly_contribution = v;
    }
    if let Some(v) = s.annual_return {
        state.stock_market.annual_return = v;
    }
    if let Some(v) = s.management_fee_percent {
        state.stock_market.management_fee_percent = v;
    }

    let c = payload.checking_account;
    if let Some(v) = c.amount {
        state.checking_account.amount = v;
    }
    if let Some(v) = c.annual_interest {
        state.checking_account.annual_interest = v;
    }

    let l = payload.low_risk;
    if let Some(v) = l.initial_investment {
        state.low_risk.initial_investment = v;
    }
    if let Some(v) = l.monthly_contribution {
        state.low_risk.monthly_contribution = v;
    }
    if let Some(v) = l.annual_return {
        state.low_risk.annual_return = v;
    }
    if let Some(v) = l.management_fee_percent {
        state.low_risk.management_fee_percent = v;
    }
    if let Some(v) = l.is_cpi_linked {
        state.low_risk.is_cpi_linked = v;
    }

    let r = payload.real_estate;
    let re = &mut state.real_estate;
    if let Some(v) = r.apartment_price {
        re.apartment_price = v;
    }
    if let Some(v) = r.mortgage_percent {
        re.mortgage_percent = v;
    }
    if let Some(v) = r.mortgage_years {
        re.mortgage_years = v;
    }
    if let Some(v) = r.mortgage_interest_rate {
        re.mortgage_interest_rate = v;
    }
    if let Some(v) = r.cpi_linked_percent {
        re.cpi_linked_percent = v;
    }
    if let Some(v) = r.cpi_linked_interest_rate {
        re.cpi_linked_interest_rate = v;
    }
    if let Some(v) = r.cpi_linked_years {
        re.cpi_linked_years = v;
    }
    if let Some(v) = r.annual_appreciation {
        re.annual_appreciation = v;
    }
    if let Some(v) = r.monthly_rent {
        re.monthly_rent = v;
    }
    if let Some(v) = r.annual_rent_increase {
        re.annual_rent_increase = v;
    }
    if let Some(v) = r.vacancy_rate_percent {
        re.vacancy_rate_percent = v;
    }
    if let Some(v) = r.annual_maintenance_cost {
        re.annual_maintenance_cost = v;
    }
    if let Some(v) = r.is_first_apartment {
        re.is_first_apartment = v;
    }
    if let Some(v) = r.lawyer_and_agent_percent {
        re.lawyer_and_agent_percent = v;
    }
    if let Some(v) = r.rental_tax_track {
        re.rental_tax_track = v;
    }
    if let Some(v) = r.renovation_cost {
        re.renovation_cost = v;
    }
    if let Some(v) = r.annual_insurance {
        re.annual_insurance = v;
    }

    validate_state(&state)?;
    Ok(state)
}

fn validate_state(state: &ComparisonState) -> Result<(), InputError> {
    let g = &state.global_inputs;
    non_negative("globalInputs.inflationRate", g.inflation_rate)?;
    if !(1..=MAX_YEARS).contains(&g.years) {
        return Err(InputError::OutOfRange {
            field: "globalInputs.years",
            min: 1.0,
            max: MAX_YEARS as f64,
        });
    }

    let s = &state.stock_market;
    non_negative("stockMarket.initialInvestment", s.initial_investment)?;
    non_negative("stockMarket.monthlyContribution", s.monthly_contribution)?;
    above_total_loss("stockMarket.annualReturn", s.annual_return)?;
    percentage("stockMarket.managementFeePercent", s.management_fee_percent)?;
    net_of_fee_above_total_loss(
        "stockMarket.annualReturn",
        s.annual_return,
        s.management_fee_percent,
    )?;

    let c = &state.checking_account;
    non_negative("checkingAccount.amount", c.amount)?;
    above_total_loss("checkingAccount.annualInterest", c.annual_interest)?;

    let l = &state.low_risk;
    non_negative("lowRisk.initialInvestment", l.initial_investment)?;
    non_negative("lowRisk.monthlyContribution", l.monthly_contribution)?;
    above_total_loss("lowRisk.annualReturn", l.annual_return)?;
    percentage("lowRisk.managementFeePercent", l.management_fee_percent)?;
    net_of_fee_above_total_loss(
        "lowRisk.annualReturn",
        l.nominal_annual_return(g.inflation_rate),
        l.management_fee_percent,
    )?;

    let re = &state.real_estate;
    non_negative("realEstate.apartmentPrice", re.apartment_price)?;
    percentage("realEstate.mortgagePercent", re.mortgage_percent)?;
    if !(1..=MAX_MORTGAGE_YEARS).contains(&re.mortgage_years) {
        return Err(InputError::OutOfRange {
            field: "realEstate.mortgageYears",
            min: 1.0,
            max: MAX_MORTGAGE_YEARS as f64,
        });
    }
    if re.cpi_linked_years > MAX_MORTGAGE_YEARS {
        return Err(InputError::OutOfRange {
            field: "realEstate.cpiLinkedYears",
            min: 0.0,
            max: MAX_MORTGAGE_YEARS as f64,
        });
    }
    non_negative("realEstate.mortgageInterestRate", re.mortgage_interest_rate)?;
    percentage("realEstate.cpiLinkedPercent", re.cpi_linked_percent)?;
    non_negative("realEstate.cpiLinkedInterestRate", re.cpi_linked_interest_rate)?;
    above_total_loss("realEstate.annualAppreciation", re.annual_appreciation)?;
    non_negative("realEstate.monthlyRent", re.monthly_rent)?;
    above_total_loss("realEstate.annualRentIncrease", re.annual_rent_increase)?;
    percentage("realEstate.vacancyRatePercent", re.vacancy_rate_percent)?;
    non_negative("realEstate.annualMaintenanceCost", re.annual_maintenance_cost)?;
    percentage("realEstate.lawyerAndAgentPercent", re.lawyer_and_agent_percent)?;
    non_negative("realEstate.renovationCost", re.renovation_cost)?;
    non_negative("realEstate.annualInsurance", re.annual_insurance)?;

    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(InputError::Negative { field });
    }
    Ok(())
}

fn percentage(field: &'static str, value: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(InputError::OutOfRange {
            field,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

fn net_of_fee_above_total_loss(
    field: &'static str,
    annual_return: f64,
    fee_percent: f64,
) -> Result<(), InputError> {
    if annual_return - fee_percent <= -100.0 {
        return Err(InputError::NetOfFeeBelowTotalLoss { field });
    }
    Ok(())
}

fn above_total_loss(field: &'static str, value: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if value <= -100.0 {
        return Err(InputError::BelowTotalLoss { field });
    }
    Ok(())
}

fn default_state_for_api() -> ComparisonState {
    ComparisonState {
        global_inputs: GlobalInputs {
            inflation_rate: 2.5,
            years: 10,
            tax_bracket: TaxBracket::Standard,
        },
        active_investments: vec![VehicleType::StockMarket],
        stock_market: StockMarketInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 2_000.0,
            annual_return: 8.0,
            management_fee_percent: 0.5,
        },
        checking_account: CheckingAccountInputs {
            amount: 100_000.0,
            annual_interest: 0.0,
        },
        low_risk: LowRiskInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 2_000.0,
            annual_return: 3.5,
            management_fee_percent: 0.15,
            is_cpi_linked: true,
        },
        real_estate: RealEstateInputs {
            apartment_price: 2_000_000.0,
            mortgage_percent: 60.0,
            mortgage_years: 25,
            mortgage_interest_rate: 4.5,
            cpi_linked_percent: 33.0,
            cpi_linked_interest_rate: 3.0,
            cpi_linked_years: 25,
            annual_appreciation: 4.0,
            monthly_rent: 5_500.0,
            annual_rent_increase: 2.5,
            vacancy_rate_percent: 4.0,
            annual_maintenance_cost: 12_000.0,
            is_first_apartment: true,
            lawyer_and_agent_percent: 2.5,
            rental_tax_track: RentalTaxTrack::TenPercent,
            renovation_cost: 0.0,
            annual_insurance: 2_000.0,
        },
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_handler),
        )
        .route("/api/project", post(project_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "investment comparison API listening");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(Query(query): Query<CompareQuery>) -> Response {
    compare_response(query.into_payload().and_then(compare_from_payload))
}

async fn compare_handler(Json(payload): Json<ComparePayload>) -> Response {
    compare_response(compare_from_payload(payload))
}

fn compare_response(outcome: Result<ComparisonReport, InputError>) -> Response {
    match outcome {
        Ok(report) => {
            info!(vehicles = report.results.len(), "comparison served");
            json_response(StatusCode::OK, report)
        }
        Err(err) => {
            warn!(error = %err, "rejected comparison payload");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

async fn project_handler(Json(payload): Json<ProjectPayload>) -> Response {
    match project_from_payload(payload) {
        Ok(result) => {
            info!(vehicle = ?result.vehicle(), "projection served");
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(error = %err, "rejected projection payload");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn compare_from_payload(payload: ComparePayload) -> Result<ComparisonReport, InputError> {
    let state = state_from_payload(payload)?;
    Ok(run_comparison(&state))
}

fn project_from_payload(payload: ProjectPayload) -> Result<VehicleResult, InputError> {
    let state = state_from_payload(payload.scenario)?;
    let inputs = state.inputs_for(payload.vehicle.into());
    Ok(project(&inputs, &state.global_inputs))
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
