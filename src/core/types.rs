use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleType {
    StockMarket,
    CheckingAccount,
    LowRisk,
    RealEstate,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::StockMarket,
        VehicleType::CheckingAccount,
        VehicleType::LowRisk,
        VehicleType::RealEstate,
    ];
}

/// Capital-gains bracket. Unrecognised values deserialize to `Other` and are
/// taxed at zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxBracket {
    Standard,
    Significant,
    #[serde(other)]
    Other,
}

/// Rental income tax track. Unrecognised values deserialize to `Other` and are
/// taxed at zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RentalTaxTrack {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "10percent", alias = "tenPercent", alias = "ten-percent")]
    TenPercent,
    #[serde(rename = "exempt")]
    Exempt,
    #[serde(rename = "marginal")]
    Marginal,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalInputs {
    pub inflation_rate: f64,
    pub years: u32,
    pub tax_bracket: TaxBracket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMarketInputs {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub annual_return: f64,
    pub management_fee_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckingAccountInputs {
    pub amount: f64,
    pub annual_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowRiskInputs {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub annual_return: f64,
    pub management_fee_percent: f64,
    #[serde(rename = "isCPILinked", alias = "isCpiLinked")]
    pub is_cpi_linked: bool,
}

impl LowRiskInputs {
    /// Annual return before fees. A CPI-linked fund quotes a real return on
    /// top of inflation, so it is converted to nominal first.
    pub fn nominal_annual_return(&self, inflation_rate: f64) -> f64 {
        if self.is_cpi_linked {
            ((1.0 + self.annual_return / 100.0) * (1.0 + inflation_rate / 100.0) - 1.0) * 100.0
        } else {
            self.annual_return
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateInputs {
    pub apartment_price: f64,
    pub mortgage_percent: f64,
    pub mortgage_years: u32,
    pub mortgage_interest_rate: f64,
    pub cpi_linked_percent: f64,
    pub cpi_linked_interest_rate: f64,
    /// Amortization length of the CPI-linked track; `0` means "same as
    /// `mortgage_years`".
    #[serde(default)]
    pub cpi_linked_years: u32,
    pub annual_appreciation: f64,
    pub monthly_rent: f64,
    pub annual_rent_increase: f64,
    pub vacancy_rate_percent: f64,
    pub annual_maintenance_cost: f64,
    pub is_first_apartment: bool,
    pub lawyer_and_agent_percent: f64,
    pub rental_tax_track: RentalTaxTrack,
    pub renovation_cost: f64,
    pub annual_insurance: f64,
}

impl RealEstateInputs {
    pub fn effective_cpi_linked_years(&self) -> u32 {
        if self.cpi_linked_percent <= 0.0 || self.cpi_linked_years == 0 {
            self.mortgage_years
        } else {
            self.cpi_linked_years
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "inputs", rename_all = "camelCase")]
pub enum VehicleInputs {
    StockMarket(StockMarketInputs),
    CheckingAccount(CheckingAccountInputs),
    LowRisk(LowRiskInputs),
    RealEstate(RealEstateInputs),
}

impl VehicleInputs {
    pub fn vehicle(&self) -> VehicleType {
        match self {
            VehicleInputs::StockMarket(_) => VehicleType::StockMarket,
            VehicleInputs::CheckingAccount(_) => VehicleType::CheckingAccount,
            VehicleInputs::LowRisk(_) => VehicleType::LowRisk,
            VehicleInputs::RealEstate(_) => VehicleType::RealEstate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonState {
    pub global_inputs: GlobalInputs,
    pub active_investments: Vec<VehicleType>,
    pub stock_market: StockMarketInputs,
    pub checking_account: CheckingAccountInputs,
    pub low_risk: LowRiskInputs,
    pub real_estate: RealEstateInputs,
}

impl ComparisonState {
    pub fn is_active(&self, vehicle: VehicleType) -> bool {
        self.active_investments.contains(&vehicle)
    }

    pub fn inputs_for(&self, vehicle: VehicleType) -> VehicleInputs {
        match vehicle {
            VehicleType::StockMarket => VehicleInputs::StockMarket(self.stock_market.clone()),
            VehicleType::CheckingAccount => {
                VehicleInputs::CheckingAccount(self.checking_account.clone())
            }
            VehicleType::LowRisk => VehicleInputs::LowRisk(self.low_risk.clone()),
            VehicleType::RealEstate => VehicleInputs::RealEstate(self.real_estate.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyDataPoint {
    pub year: u32,
    pub nominal_value: f64,
    pub real_value: f64,
    pub total_contributions: f64,
}

/// Fields shared by every vehicle result. Monetary values are rounded to whole
/// units; `annualized_return` is a percentage rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_contributions: f64,
    pub gross_final_value: f64,
    pub gross_profit: f64,
    pub tax_amount: f64,
    pub net_final_value: f64,
    pub net_profit: f64,
    pub real_final_value: f64,
    pub real_profit: f64,
    pub annualized_return: f64,
    pub yearly_data: Vec<YearlyDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMarketResult {
    #[serde(flatten)]
    pub summary: ProjectionSummary,
    pub total_fees_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckingAccountResult {
    #[serde(flatten)]
    pub summary: ProjectionSummary,
    pub purchasing_power_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowRiskResult {
    #[serde(flatten)]
    pub summary: ProjectionSummary,
    pub total_fees_paid: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageBreakdown {
    pub initial_monthly_payment: f64,
    pub final_monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub non_linked_payment: f64,
    pub cpi_linked_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateResult {
    #[serde(flatten)]
    pub summary: ProjectionSummary,
    pub mortgage: MortgageBreakdown,
    pub down_payment: f64,
    pub purchase_tax: f64,
    pub total_upfront_costs: f64,
    pub future_property_value: f64,
    pub total_rental_income: f64,
    pub net_rental_income: f64,
    pub total_rental_tax: f64,
    pub total_maintenance_costs: f64,
    pub total_mortgage_paid: f64,
    pub remaining_mortgage: f64,
    pub equity: f64,
    pub monthly_payment_at_end: f64,
    pub average_monthly_cash_flow: f64,
    pub cash_on_cash_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VehicleResult {
    StockMarket(StockMarketResult),
    CheckingAccount(CheckingAccountResult),
    LowRisk(LowRiskResult),
    RealEstate(RealEstateResult),
}

impl VehicleResult {
    pub fn vehicle(&self) -> VehicleType {
        match self {
            VehicleResult::StockMarket(_) => VehicleType::StockMarket,
            VehicleResult::CheckingAccount(_) => VehicleType::CheckingAccount,
            VehicleResult::LowRisk(_) => VehicleType::LowRisk,
            VehicleResult::RealEstate(_) => VehicleType::RealEstate,
        }
    }

    pub fn summary(&self) -> &ProjectionSummary {
        match self {
            VehicleResult::StockMarket(r) => &r.summary,
            VehicleResult::CheckingAccount(r) => &r.summary,
            VehicleResult::LowRisk(r) => &r.summary,
            VehicleResult::RealEstate(r) => &r.summary,
        }
    }

    pub fn as_real_estate(&self) -> Option<&RealEstateResult> {
        match self {
            VehicleResult::RealEstate(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BetterOption {
    Stock,
    RealEstate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCostResult {
    pub alternative_stock_value: f64,
    pub alternative_profit: f64,
    pub real_estate_total_return: f64,
    pub difference: f64,
    pub better_option: BetterOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenPoint {
    pub year: u32,
    pub stock_value: f64,
    pub real_estate_value: f64,
    pub break_even_year: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub results: std::collections::BTreeMap<VehicleType, VehicleResult>,
    pub opportunity_cost: Option<OpportunityCostResult>,
    pub break_even: Option<Vec<BreakEvenPoint>>,
}
