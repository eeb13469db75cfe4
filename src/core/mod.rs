mod compare;
pub mod inflation;
pub mod mortgage;
mod projectors;
pub mod tax;
mod types;

pub use compare::{
    MIN_BREAK_EVEN_HORIZON, compute_break_even, compute_opportunity_cost, compute_results,
    run_comparison,
};
pub use projectors::{
    project, project_checking_account, project_low_risk, project_real_estate,
    project_stock_market,
};
pub use types::{
    BetterOption, BreakEvenPoint, CheckingAccountInputs, CheckingAccountResult, ComparisonReport,
    ComparisonState, GlobalInputs, LowRiskInputs, LowRiskResult, MortgageBreakdown,
    OpportunityCostResult, ProjectionSummary, RealEstateInputs, RealEstateResult, RentalTaxTrack,
    StockMarketInputs, StockMarketResult, TaxBracket, VehicleInputs, VehicleResult, VehicleType,
    YearlyDataPoint,
};
