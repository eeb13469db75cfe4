use super::inflation::adjust_for_inflation;
use super::mortgage::FullMortgage;
use super::tax::{
    bank_interest_tax, capital_gains_tax, purchase_tax, real_estate_capital_gains_tax, rental_tax,
};
use super::types::{
    CheckingAccountInputs, CheckingAccountResult, GlobalInputs, LowRiskInputs, LowRiskResult,
    MortgageBreakdown, ProjectionSummary, RealEstateInputs, RealEstateResult, StockMarketInputs,
    StockMarketResult, VehicleInputs, VehicleResult, YearlyDataPoint,
};

pub fn project(inputs: &VehicleInputs, global: &GlobalInputs) -> VehicleResult {
    match inputs {
        VehicleInputs::StockMarket(i) => VehicleResult::StockMarket(project_stock_market(i, global)),
        VehicleInputs::CheckingAccount(i) => {
            VehicleResult::CheckingAccount(project_checking_account(i, global))
        }
        VehicleInputs::LowRisk(i) => VehicleResult::LowRisk(project_low_risk(i, global)),
        VehicleInputs::RealEstate(i) => VehicleResult::RealEstate(project_real_estate(i, global)),
    }
}

pub fn project_stock_market(inputs: &StockMarketInputs, global: &GlobalInputs) -> StockMarketResult {
    let fund = FundPlan {
        initial_investment: inputs.initial_investment,
        monthly_contribution: inputs.monthly_contribution,
        nominal_annual_return: inputs.annual_return,
        management_fee_percent: inputs.management_fee_percent,
        floor_negative_rates: false,
    };
    let (summary, total_fees_paid) = fund.project(global);
    StockMarketResult {
        summary,
        total_fees_paid,
    }
}

pub fn project_low_risk(inputs: &LowRiskInputs, global: &GlobalInputs) -> LowRiskResult {
    let fund = FundPlan {
        initial_investment: inputs.initial_investment,
        monthly_contribution: inputs.monthly_contribution,
        nominal_annual_return: inputs.nominal_annual_return(global.inflation_rate),
        management_fee_percent: inputs.management_fee_percent,
        floor_negative_rates: true,
    };
    let (summary, total_fees_paid) = fund.project(global);
    LowRiskResult {
        summary,
        total_fees_paid,
    }
}

pub fn project_checking_account(
    inputs: &CheckingAccountInputs,
    global: &GlobalInputs,
) -> CheckingAccountResult {
    let amount = inputs.amount;
    let growth = 1.0 + inputs.annual_interest / 100.0;

    let yearly_data = (0..=global.years)
        .map(|year| {
            let nominal_value = amount * growth.powi(year as i32);
            YearlyDataPoint {
                year,
                nominal_value: round_currency(nominal_value),
                real_value: round_currency(adjust_for_inflation(
                    nominal_value,
                    global.inflation_rate,
                    year,
                )),
                total_contributions: round_currency(amount),
            }
        })
        .collect();

    let gross_final_value = amount * growth.powi(global.years as i32);
    let gross_profit = gross_final_value - amount;
    let tax_amount = bank_interest_tax(gross_profit);
    let net_final_value = gross_final_value - tax_amount;
    let real_final_value = adjust_for_inflation(net_final_value, global.inflation_rate, global.years);
    let purchasing_power_loss =
        amount - adjust_for_inflation(amount, global.inflation_rate, global.years);

    CheckingAccountResult {
        summary: ProjectionSummary {
            total_contributions: round_currency(amount),
            gross_final_value: round_currency(gross_final_value),
            gross_profit: round_currency(gross_profit),
            tax_amount: round_currency(tax_amount),
            net_final_value: round_currency(net_final_value),
            net_profit: round_currency(net_final_value - amount),
            real_final_value: round_currency(real_final_value),
            real_profit: round_currency(real_final_value - amount),
            annualized_return: annualized_return(gross_final_value, amount, global.years),
            yearly_data,
        },
        purchasing_power_loss: round_currency(purchasing_power_loss),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct PropertyLedger {
    rent_collected: f64,
    rental_tax_paid: f64,
    maintenance_paid: f64,
    mortgage_paid: f64,
}

impl PropertyLedger {
    fn cash_spent(&self) -> f64 {
        self.mortgage_paid + self.maintenance_paid + self.rental_tax_paid
    }
}

pub fn project_real_estate(inputs: &RealEstateInputs, global: &GlobalInputs) -> RealEstateResult {
    let price = inputs.apartment_price;
    let years = global.years;

    let down_payment = price * (1.0 - inputs.mortgage_percent / 100.0);
    let purchase_tax = purchase_tax(price, inputs.is_first_apartment);
    let lawyer_and_agent_cost = price * (inputs.lawyer_and_agent_percent / 100.0);
    let total_upfront_costs =
        down_payment + purchase_tax + lawyer_and_agent_cost + inputs.renovation_cost;

    let mortgage = FullMortgage::new(
        price * (inputs.mortgage_percent / 100.0),
        inputs.cpi_linked_percent,
        inputs.mortgage_interest_rate,
        inputs.cpi_linked_interest_rate,
        inputs.mortgage_years,
        inputs.effective_cpi_linked_years(),
        global.inflation_rate,
    );

    let appreciation_growth = 1.0 + inputs.annual_appreciation / 100.0;
    let rent_growth = 1.0 + inputs.annual_rent_increase / 100.0;
    let occupancy = 1.0 - inputs.vacancy_rate_percent / 100.0;
    let yearly_upkeep = inputs.annual_maintenance_cost + inputs.annual_insurance;

    let mut ledger = PropertyLedger::default();
    let mut yearly_data = Vec::with_capacity(years as usize + 1);

    for year in 0..=years {
        let property_value = price * appreciation_growth.powi(year as i32);
        let equity = property_value - mortgage.balance_at_month(year * 12);

        if year > 0 {
            let collected_rent =
                inputs.monthly_rent * 12.0 * rent_growth.powi(year as i32 - 1) * occupancy;
            ledger.rent_collected += collected_rent;
            ledger.rental_tax_paid += rental_tax(collected_rent, inputs.rental_tax_track);
            ledger.maintenance_paid += yearly_upkeep;
            ledger.mortgage_paid += mortgage.paid_during_year(year);
        }

        let cash_out = total_upfront_costs + ledger.cash_spent();
        let net_position = equity + ledger.rent_collected - cash_out;

        yearly_data.push(YearlyDataPoint {
            year,
            nominal_value: round_currency(net_position),
            real_value: round_currency(adjust_for_inflation(
                net_position,
                global.inflation_rate,
                year,
            )),
            total_contributions: round_currency(cash_out),
        });
    }

    let future_property_value = price * appreciation_growth.powi(years as i32);
    let capital_gains_tax = real_estate_capital_gains_tax(future_property_value - price);
    let remaining_mortgage = mortgage.balance_at_month(years * 12);
    let equity = future_property_value - remaining_mortgage;

    let total_cash_out = total_upfront_costs + ledger.cash_spent();
    let total_cash_in = equity + ledger.rent_collected;
    let gross_profit = total_cash_in - total_cash_out;
    let net_profit = gross_profit - capital_gains_tax;
    let net_final_value = total_cash_in - capital_gains_tax;
    let real_final_value = adjust_for_inflation(net_final_value, global.inflation_rate, years);

    let net_rental_income =
        ledger.rent_collected - ledger.rental_tax_paid - ledger.maintenance_paid;
    let horizon_months = (years * 12) as f64;
    let average_monthly_cash_flow = if horizon_months > 0.0 {
        (net_rental_income - ledger.mortgage_paid) / horizon_months
    } else {
        0.0
    };
    let cash_on_cash_return = if total_cash_out > 0.0 {
        net_profit / total_cash_out * 100.0
    } else {
        0.0
    };
    let monthly_payment_at_end = mortgage.payment_at_month(years * 12);

    RealEstateResult {
        summary: ProjectionSummary {
            total_contributions: round_currency(total_cash_out),
            gross_final_value: round_currency(total_cash_in),
            gross_profit: round_currency(gross_profit),
            tax_amount: round_currency(capital_gains_tax),
            net_final_value: round_currency(net_final_value),
            net_profit: round_currency(net_profit),
            real_final_value: round_currency(real_final_value),
            real_profit: round_currency(real_final_value - total_cash_out),
            annualized_return: annualized_return(total_cash_in, total_cash_out, years),
            yearly_data,
        },
        mortgage: MortgageBreakdown {
            initial_monthly_payment: round_currency(mortgage.initial_monthly_payment),
            final_monthly_payment: round_currency(monthly_payment_at_end),
            total_paid: round_currency(mortgage.total_paid),
            total_interest: round_currency(mortgage.total_interest),
            non_linked_payment: round_currency(mortgage.non_linked.monthly_payment),
            cpi_linked_payment: round_currency(mortgage.cpi_linked.monthly_payment),
        },
        down_payment: round_currency(down_payment),
        purchase_tax: round_currency(purchase_tax),
        total_upfront_costs: round_currency(total_upfront_costs),
        future_property_value: round_currency(future_property_value),
        total_rental_income: round_currency(ledger.rent_collected),
        net_rental_income: round_currency(net_rental_income),
        total_rental_tax: round_currency(ledger.rental_tax_paid),
        total_maintenance_costs: round_currency(ledger.maintenance_paid),
        total_mortgage_paid: round_currency(ledger.mortgage_paid),
        remaining_mortgage: round_currency(remaining_mortgage),
        equity: round_currency(equity),
        monthly_payment_at_end: round_currency(monthly_payment_at_end),
        average_monthly_cash_flow: round_currency(average_monthly_cash_flow),
        cash_on_cash_return: round_percent(cash_on_cash_return),
    }
}

/// Lump sum plus level monthly contributions, compounded monthly.
#[derive(Debug, Clone, Copy)]
struct FundPlan {
    initial_investment: f64,
    monthly_contribution: f64,
    nominal_annual_return: f64,
    management_fee_percent: f64,
    floor_negative_rates: bool,
}

impl FundPlan {
    fn monthly_rates(&self) -> (f64, f64) {
        let net = monthly_rate(self.nominal_annual_return - self.management_fee_percent);
        let raw = monthly_rate(self.nominal_annual_return);
        if self.floor_negative_rates {
            (net.max(0.0), raw.max(0.0))
        } else {
            (net, raw)
        }
    }

    fn contributions_after(&self, months: u32) -> f64 {
        self.initial_investment + self.monthly_contribution * months as f64
    }

    fn value_after(&self, rate: f64, months: u32) -> f64 {
        if rate == 0.0 {
            return self.contributions_after(months);
        }
        let growth = (1.0 + rate).powi(months as i32);
        self.initial_investment * growth + self.monthly_contribution * (growth - 1.0) / rate
    }

    /// Returns the summary and the fees attributed by differencing against a
    /// fee-free run of the same plan.
    fn project(&self, global: &GlobalInputs) -> (ProjectionSummary, f64) {
        let (net_rate, raw_rate) = self.monthly_rates();
        let mut total_fees_paid = 0.0;
        let mut yearly_data = Vec::with_capacity(global.years as usize + 1);

        for year in 0..=global.years {
            let months = year * 12;
            let value = self.value_after(net_rate, months);
            let without_fees = self.value_after(raw_rate, months);

            if year > 0 {
                let fees_this_year = without_fees - value - total_fees_paid;
                total_fees_paid += fees_this_year.max(0.0);
            }

            yearly_data.push(YearlyDataPoint {
                year,
                nominal_value: round_currency(value),
                real_value: round_currency(adjust_for_inflation(
                    value,
                    global.inflation_rate,
                    year,
                )),
                total_contributions: round_currency(self.contributions_after(months)),
            });
        }

        let total_months = global.years * 12;
        let total_contributions = self.contributions_after(total_months);
        let gross_final_value = self.value_after(net_rate, total_months);
        let gross_profit = gross_final_value - total_contributions;
        let tax_amount = capital_gains_tax(gross_profit, global.tax_bracket);
        let net_final_value = gross_final_value - tax_amount;
        let real_final_value =
            adjust_for_inflation(net_final_value, global.inflation_rate, global.years);

        let summary = ProjectionSummary {
            total_contributions: round_currency(total_contributions),
            gross_final_value: round_currency(gross_final_value),
            gross_profit: round_currency(gross_profit),
            tax_amount: round_currency(tax_amount),
            net_final_value: round_currency(net_final_value),
            net_profit: round_currency(net_final_value - total_contributions),
            real_final_value: round_currency(real_final_value),
            real_profit: round_currency(real_final_value - total_contributions),
            annualized_return: annualized_return(gross_final_value, total_contributions, global.years),
            yearly_data,
        };
        (summary, round_currency(total_fees_paid))
    }
}

/// Equivalent monthly rate. A loss of 100% or more bottoms out at -1.
fn monthly_rate(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).max(0.0).powf(1.0 / 12.0) - 1.0
}

/// CAGR in percent, two decimals.
fn annualized_return(final_value: f64, invested: f64, years: u32) -> f64 {
    if invested <= 0.0 || years == 0 {
        return 0.0;
    }
    let ratio = (final_value / invested).max(0.0);
    round_percent((ratio.powf(1.0 / years as f64) - 1.0) * 100.0)
}

fn round_currency(value: f64) -> f64 {
    value.round()
}

fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{RentalTaxTrack, TaxBracket};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn global(years: u32) -> GlobalInputs {
        GlobalInputs {
            inflation_rate: 2.5,
            years,
            tax_bracket: TaxBracket::Standard,
        }
    }

    fn sample_stock() -> StockMarketInputs {
        StockMarketInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 2_000.0,
            annual_return: 8.0,
            management_fee_percent: 0.5,
        }
    }

    fn sample_low_risk() -> LowRiskInputs {
        LowRiskInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 2_000.0,
            annual_return: 3.5,
            management_fee_percent: 0.15,
            is_cpi_linked: true,
        }
    }

    fn sample_real_estate() -> RealEstateInputs {
        RealEstateInputs {
            apartment_price: 2_000_000.0,
            mortgage_percent: 60.0,
            mortgage_years: 25,
            mortgage_interest_rate: 4.5,
            cpi_linked_percent: 33.0,
            cpi_linked_interest_rate: 3.0,
            cpi_linked_years: 20,
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
        }
    }

    fn cash_purchase() -> RealEstateInputs {
        RealEstateInputs {
            apartment_price: 1_000_000.0,
            mortgage_percent: 0.0,
            mortgage_years: 25,
            mortgage_interest_rate: 4.5,
            cpi_linked_percent: 0.0,
            cpi_linked_interest_rate: 3.0,
            cpi_linked_years: 0,
            annual_appreciation: 5.0,
            monthly_rent: 4_000.0,
            annual_rent_increase: 0.0,
            vacancy_rate_percent: 0.0,
            annual_maintenance_cost: 1_000.0,
            is_first_apartment: true,
            lawyer_and_agent_percent: 2.0,
            rental_tax_track: RentalTaxTrack::TenPercent,
            renovation_cost: 0.0,
            annual_insurance: 0.0,
        }
    }

    #[test]
    fn checking_account_without_interest_only_loses_purchasing_power() {
        let inputs = CheckingAccountInputs {
            amount: 100_000.0,
            annual_interest: 0.0,
        };
        let result = project_checking_account(&inputs, &global(10));
        let s = &result.summary;

        assert_eq!(s.gross_final_value, 100_000.0);
        assert_eq!(s.gross_profit, 0.0);
        assert_eq!(s.tax_amount, 0.0);
        assert_eq!(s.net_final_value, 100_000.0);
        assert_approx_tol(s.real_final_value, 78_120.0, 1.0);
        assert_approx_tol(result.purchasing_power_loss, 21_880.0, 1.0);
        assert_eq!(s.annualized_return, 0.0);
        assert_eq!(s.yearly_data.len(), 11);
        assert!(s.yearly_data.iter().all(|p| p.total_contributions == 100_000.0));
    }

    #[test]
    fn checking_account_interest_taxed_at_bank_rate() {
        let inputs = CheckingAccountInputs {
            amount: 100_000.0,
            annual_interest: 3.0,
        };
        let result = project_checking_account(&inputs, &global(10));
        let s = &result.summary;

        let gross = 100_000.0 * 1.03f64.powi(10);
        assert_approx_tol(s.gross_final_value, gross, 0.5);
        assert_approx_tol(s.tax_amount, (gross - 100_000.0) * 0.15, 0.5);
        assert_approx_tol(s.annualized_return, 3.0, 1e-9);
    }

    #[test]
    fn stock_market_lump_sum_without_fee_compounds_annually() {
        let inputs = StockMarketInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 0.0,
            annual_return: 8.0,
            management_fee_percent: 0.0,
        };
        let result = project_stock_market(&inputs, &global(10));
        let s = &result.summary;

        let gross = 100_000.0 * 1.08f64.powi(10);
        assert_approx_tol(s.gross_final_value, gross, 0.5);
        assert_approx_tol(s.tax_amount, (gross - 100_000.0) * 0.25, 0.5);
        assert_approx_tol(s.net_profit, (gross - 100_000.0) * 0.75, 1.0);
        assert_eq!(result.total_fees_paid, 0.0);
        assert_approx_tol(s.annualized_return, 8.0, 1e-9);
    }

    #[test]
    fn stock_market_significant_bracket_pays_more_tax() {
        let inputs = sample_stock();
        let standard = project_stock_market(&inputs, &global(15));
        let mut significant_global = global(15);
        significant_global.tax_bracket = TaxBracket::Significant;
        let significant = project_stock_market(&inputs, &significant_global);

        assert!(significant.summary.tax_amount > standard.summary.tax_amount);
        assert_eq!(
            significant.summary.gross_final_value,
            standard.summary.gross_final_value
        );
    }

    #[test]
    fn stock_market_fees_match_fee_free_shortfall() {
        let inputs = sample_stock();
        let with_fee = project_stock_market(&inputs, &global(20));
        let mut fee_free_inputs = inputs.clone();
        fee_free_inputs.management_fee_percent = 0.0;
        let fee_free = project_stock_market(&fee_free_inputs, &global(20));

        let shortfall = fee_free.summary.gross_final_value - with_fee.summary.gross_final_value;
        assert!(with_fee.total_fees_paid > 0.0);
        assert_approx_tol(with_fee.total_fees_paid, shortfall, 2.0);
    }

    #[test]
    fn stock_market_zero_return_is_linear() {
        let inputs = StockMarketInputs {
            initial_investment: 10_000.0,
            monthly_contribution: 500.0,
            annual_return: 0.0,
            management_fee_percent: 0.0,
        };
        let result = project_stock_market(&inputs, &global(5));
        assert_eq!(result.summary.gross_final_value, 40_000.0);
        assert_eq!(result.summary.total_contributions, 40_000.0);
        assert_eq!(result.summary.tax_amount, 0.0);
        assert_eq!(result.summary.yearly_data[1].nominal_value, 16_000.0);
    }

    #[test]
    fn low_risk_cpi_linked_converts_real_return_to_nominal() {
        let inputs = LowRiskInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 0.0,
            annual_return: 3.5,
            management_fee_percent: 0.0,
            is_cpi_linked: true,
        };
        let result = project_low_risk(&inputs, &global(1));
        assert_approx_tol(result.summary.gross_final_value, 106_087.5, 0.5);

        let mut nominal_inputs = inputs.clone();
        nominal_inputs.is_cpi_linked = false;
        let nominal = project_low_risk(&nominal_inputs, &global(1));
        assert_approx_tol(nominal.summary.gross_final_value, 103_500.0, 0.5);
    }

    #[test]
    fn low_risk_cpi_conversion_happens_before_fee_deduction() {
        let inputs = LowRiskInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 0.0,
            annual_return: 3.5,
            management_fee_percent: 0.5,
            is_cpi_linked: true,
        };
        let result = project_low_risk(&inputs, &global(1));

        let nominal = 1.035 * 1.025 - 1.0;
        assert_approx_tol(
            result.summary.gross_final_value,
            100_000.0 * (1.0 + nominal - 0.005),
            1.0,
        );
        assert!(result.total_fees_paid > 0.0);
        assert_approx_tol(result.total_fees_paid, 500.0, 1.0);
    }

    #[test]
    fn fee_attribution_clamps_shrinking_gap_to_zero() {
        // Under steep losses the gap to the fee-free run narrows in year two.
        let inputs = StockMarketInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 0.0,
            annual_return: -50.0,
            management_fee_percent: 10.0,
        };
        let one_year = project_stock_market(&inputs, &global(1));
        let two_years = project_stock_market(&inputs, &global(2));

        assert_approx_tol(one_year.total_fees_paid, 10_000.0, 1.0);
        assert_approx_tol(two_years.total_fees_paid, one_year.total_fees_paid, 1e-9);
    }

    #[test]
    fn stock_market_total_loss_net_of_fee_stays_finite() {
        let inputs = StockMarketInputs {
            initial_investment: 100_000.0,
            monthly_contribution: 1_000.0,
            annual_return: -99.5,
            management_fee_percent: 1.0,
        };
        let result = project_stock_market(&inputs, &global(3));
        let s = &result.summary;

        assert!(s.gross_final_value.is_finite());
        assert!(s.net_profit.is_finite());
        assert!(s.annualized_return.is_finite());
        assert!(result.total_fees_paid.is_finite());
        assert!(
            s.yearly_data
                .iter()
                .all(|p| p.nominal_value.is_finite() && p.real_value.is_finite())
        );
    }

    #[test]
    fn low_risk_negative_net_rate_falls_back_to_linear() {
        let inputs = LowRiskInputs {
            initial_investment: 50_000.0,
            monthly_contribution: 1_000.0,
            annual_return: 0.5,
            management_fee_percent: 1.0,
            is_cpi_linked: false,
        };
        let result = project_low_risk(&inputs, &global(3));
        assert_eq!(result.summary.gross_final_value, 86_000.0);
        assert_eq!(result.summary.gross_profit, 0.0);
        assert!(result.total_fees_paid > 0.0);
    }

    #[test]
    fn real_estate_cash_purchase_reconciles_cash_flows() {
        let result = project_real_estate(&cash_purchase(), &global(2));
        let s = &result.summary;

        assert_eq!(result.down_payment, 1_000_000.0);
        assert_eq!(result.purchase_tax, 0.0);
        assert_eq!(result.total_upfront_costs, 1_020_000.0);
        assert_eq!(result.total_rental_income, 96_000.0);
        assert_eq!(result.total_rental_tax, 9_600.0);
        assert_eq!(result.total_maintenance_costs, 2_000.0);
        assert_eq!(result.total_mortgage_paid, 0.0);
        assert_eq!(result.future_property_value, 1_102_500.0);
        assert_eq!(result.equity, 1_102_500.0);

        assert_eq!(s.total_contributions, 1_031_600.0);
        assert_eq!(s.gross_final_value, 1_198_500.0);
        assert_eq!(s.gross_profit, 166_900.0);
        assert_eq!(s.tax_amount, 25_625.0);
        assert_eq!(s.net_profit, 141_275.0);
        assert_eq!(s.net_final_value, 1_172_875.0);
        assert_eq!(result.net_rental_income, 84_400.0);

        let positions: Vec<f64> = s.yearly_data.iter().map(|p| p.nominal_value).collect();
        assert_eq!(positions, vec![-20_000.0, 72_200.0, 166_900.0]);
    }

    #[test]
    fn real_estate_mortgaged_purchase_profit_identities_hold() {
        let result = project_real_estate(&sample_real_estate(), &global(10));
        let s = &result.summary;

        assert_approx_tol(s.gross_profit, s.gross_final_value - s.total_contributions, 1.0);
        assert_approx_tol(s.net_profit, s.gross_profit - s.tax_amount, 1.0);
        assert_approx_tol(s.net_final_value, s.gross_final_value - s.tax_amount, 1.0);
        assert_approx_tol(
            result.equity,
            result.future_property_value - result.remaining_mortgage,
            1.0,
        );
        assert_approx_tol(
            s.yearly_data.last().map(|p| p.nominal_value).unwrap_or_default(),
            s.gross_profit,
            1.0,
        );
        assert!(result.remaining_mortgage > 0.0);
        assert!(result.total_mortgage_paid < result.mortgage.total_paid);
        assert!(result.mortgage.final_monthly_payment > 0.0);
        assert_approx_tol(
            result.mortgage.initial_monthly_payment,
            result.mortgage.non_linked_payment + result.mortgage.cpi_linked_payment,
            1.0,
        );
    }

    #[test]
    fn real_estate_horizon_past_mortgage_term_pays_it_off() {
        let mut inputs = sample_real_estate();
        inputs.mortgage_years = 10;
        inputs.cpi_linked_years = 8;
        let result = project_real_estate(&inputs, &global(12));

        assert_eq!(result.remaining_mortgage, 0.0);
        assert_eq!(result.monthly_payment_at_end, 0.0);
        assert_approx_tol(result.total_mortgage_paid, result.mortgage.total_paid, 2.0);
    }

    #[test]
    fn real_estate_cpi_track_length_defaults_to_mortgage_term() {
        let mut inputs = sample_real_estate();
        inputs.cpi_linked_years = 0;
        assert_eq!(inputs.effective_cpi_linked_years(), 25);

        inputs.cpi_linked_years = 15;
        assert_eq!(inputs.effective_cpi_linked_years(), 15);

        inputs.cpi_linked_percent = 0.0;
        assert_eq!(inputs.effective_cpi_linked_years(), 25);
    }

    #[test]
    fn project_dispatches_on_vehicle_tag() {
        let result = project(&VehicleInputs::LowRisk(sample_low_risk()), &global(5));
        assert_eq!(result.vehicle(), crate::core::VehicleType::LowRisk);
        assert_eq!(result.summary().yearly_data.len(), 6);
        assert!(result.as_real_estate().is_none());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_every_vehicle_reports_one_point_per_year(years in 1u32..40, inflation_bp in 0u32..800) {
            let mut g = global(years);
            g.inflation_rate = inflation_bp as f64 / 100.0;
            let vehicles = [
                VehicleInputs::StockMarket(sample_stock()),
                VehicleInputs::CheckingAccount(CheckingAccountInputs {
                    amount: 100_000.0,
                    annual_interest: 1.0,
                }),
                VehicleInputs::LowRisk(sample_low_risk()),
                VehicleInputs::RealEstate(sample_real_estate()),
            ];
            for inputs in &vehicles {
                let result = project(inputs, &g);
                let data = &result.summary().yearly_data;
                prop_assert_eq!(data.len(), years as usize + 1);
                for (idx, point) in data.iter().enumerate() {
                    prop_assert_eq!(point.year, idx as u32);
                }
            }
        }

        #[test]
        fn prop_attributed_fees_are_non_negative(
            fee_bp in 0u32..300,
            return_bp in 0u32..1_200,
            years in 1u32..30
        ) {
            let mut inputs = sample_stock();
            inputs.management_fee_percent = fee_bp as f64 / 100.0;
            inputs.annual_return = return_bp as f64 / 100.0;
            let result = project_stock_market(&inputs, &global(years));
            prop_assert!(result.total_fees_paid >= 0.0);
            prop_assert!(result.summary.tax_amount >= 0.0);
        }
    }
}
