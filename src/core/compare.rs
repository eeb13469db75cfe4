use std::collections::BTreeMap;

use tracing::debug;

use super::projectors::{project, project_real_estate, project_stock_market};
use super::types::{
    BetterOption, BreakEvenPoint, ComparisonReport, ComparisonState, GlobalInputs,
    OpportunityCostResult, RealEstateInputs, RealEstateResult, StockMarketInputs, VehicleResult,
    VehicleType,
};

/// Shortest horizon the break-even search always covers.
pub const MIN_BREAK_EVEN_HORIZON: u32 = 30;

pub fn compute_results(state: &ComparisonState) -> BTreeMap<VehicleType, VehicleResult> {
    VehicleType::ALL
        .into_iter()
        .filter(|vehicle| state.is_active(*vehicle))
        .map(|vehicle| {
            let result = project(&state.inputs_for(vehicle), &state.global_inputs);
            (vehicle, result)
        })
        .collect()
}

/// Invests the property's upfront cash in the market instead, topping up each
/// month with the initial mortgage payment net of average rent.
pub fn compute_opportunity_cost(
    real_estate: &RealEstateResult,
    stock_inputs: &StockMarketInputs,
    global: &GlobalInputs,
) -> OpportunityCostResult {
    let horizon_months = (global.years * 12) as f64;
    let average_monthly_rent = if horizon_months > 0.0 {
        real_estate.total_rental_income / horizon_months
    } else {
        0.0
    };

    let alternative_inputs = StockMarketInputs {
        initial_investment: real_estate.total_upfront_costs,
        monthly_contribution: real_estate.mortgage.initial_monthly_payment - average_monthly_rent,
        annual_return: stock_inputs.annual_return,
        management_fee_percent: stock_inputs.management_fee_percent,
    };
    let alternative = project_stock_market(&alternative_inputs, global);

    let real_estate_profit = real_estate.summary.net_profit;
    let difference = real_estate_profit - alternative.summary.net_profit;

    OpportunityCostResult {
        alternative_stock_value: alternative.summary.net_final_value,
        alternative_profit: alternative.summary.net_profit,
        real_estate_total_return: real_estate_profit,
        difference,
        better_option: if difference > 0.0 {
            BetterOption::RealEstate
        } else {
            BetterOption::Stock
        },
    }
}

/// Re-projects both vehicles at every horizon `1..=max(years, 30)` and records
/// the first horizon at which the property's net profit overtakes the market.
pub fn compute_break_even(
    stock_inputs: &StockMarketInputs,
    real_estate_inputs: &RealEstateInputs,
    global: &GlobalInputs,
) -> Vec<BreakEvenPoint> {
    let max_years = global.years.max(MIN_BREAK_EVEN_HORIZON);
    let mut points = Vec::with_capacity(max_years as usize);
    let mut break_even_year = None;

    for years in 1..=max_years {
        let horizon = GlobalInputs {
            years,
            ..global.clone()
        };
        let stock_net = project_stock_market(stock_inputs, &horizon).summary.net_profit;
        let real_estate_net = project_real_estate(real_estate_inputs, &horizon)
            .summary
            .net_profit;

        if break_even_year.is_none() && real_estate_net > stock_net {
            debug!(years, stock_net, real_estate_net, "real estate overtakes stock market");
            break_even_year = Some(years);
        }

        points.push(BreakEvenPoint {
            year: years,
            stock_value: stock_net,
            real_estate_value: real_estate_net,
            break_even_year,
        });
    }

    points
}

pub fn run_comparison(state: &ComparisonState) -> ComparisonReport {
    let results = compute_results(state);

    let opportunity_cost = results
        .get(&VehicleType::RealEstate)
        .and_then(VehicleResult::as_real_estate)
        .map(|real_estate| {
            compute_opportunity_cost(real_estate, &state.stock_market, &state.global_inputs)
        });

    let break_even = (state.is_active(VehicleType::StockMarket)
        && state.is_active(VehicleType::RealEstate))
    .then(|| compute_break_even(&state.stock_market, &state.real_estate, &state.global_inputs));

    debug!(
        vehicles = results.len(),
        has_opportunity_cost = opportunity_cost.is_some(),
        has_break_even = break_even.is_some(),
        "comparison finished"
    );

    ComparisonReport {
        results,
        opportunity_cost,
        break_even,
    }
}
