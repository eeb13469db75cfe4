use super::types::{RentalTaxTrack, TaxBracket};

#[derive(Debug, Clone, Copy)]
pub struct PurchaseTaxBracket {
    pub up_to: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TaxTable {
    pub capital_gains_standard: f64,
    pub capital_gains_significant: f64,
    pub bank_interest: f64,
    pub rental_exempt_monthly_threshold: f64,
    pub rental_flat_rate: f64,
    pub rental_min_marginal_rate: f64,
    pub real_estate_capital_gains: f64,
    pub purchase_first_apartment: &'static [PurchaseTaxBracket],
    pub purchase_additional_property: &'static [PurchaseTaxBracket],
}

pub const ISRAELI_TAX: TaxTable = TaxTable {
    capital_gains_standard: 0.25,
    capital_gains_significant: 0.30,
    bank_interest: 0.15,
    rental_exempt_monthly_threshold: 5_654.0,
    rental_flat_rate: 0.10,
    rental_min_marginal_rate: 0.31,
    real_estate_capital_gains: 0.25,
    purchase_first_apartment: &[
        PurchaseTaxBracket {
            up_to: 1_978_745.0,
            rate: 0.0,
        },
        PurchaseTaxBracket {
            up_to: 2_347_040.0,
            rate: 0.035,
        },
        PurchaseTaxBracket {
            up_to: 6_055_070.0,
            rate: 0.05,
        },
        PurchaseTaxBracket {
            up_to: 20_183_565.0,
            rate: 0.08,
        },
        PurchaseTaxBracket {
            up_to: f64::INFINITY,
            rate: 0.10,
        },
    ],
    purchase_additional_property: &[
        PurchaseTaxBracket {
            up_to: 6_055_070.0,
            rate: 0.08,
        },
        PurchaseTaxBracket {
            up_to: f64::INFINITY,
            rate: 0.10,
        },
    ],
};

pub fn capital_gains_tax(profit: f64, bracket: TaxBracket) -> f64 {
    if profit <= 0.0 {
        return 0.0;
    }
    let rate = match bracket {
        TaxBracket::Standard => ISRAELI_TAX.capital_gains_standard,
        TaxBracket::Significant => ISRAELI_TAX.capital_gains_significant,
        TaxBracket::Other => 0.0,
    };
    profit * rate
}

pub fn bank_interest_tax(interest: f64) -> f64 {
    if interest <= 0.0 {
        return 0.0;
    }
    interest * ISRAELI_TAX.bank_interest
}

/// Progressive purchase tax. A price sitting exactly on a bracket's upper
/// limit is taxed entirely within that bracket.
pub fn purchase_tax(price: f64, is_first_apartment: bool) -> f64 {
    let brackets = if is_first_apartment {
        ISRAELI_TAX.purchase_first_apartment
    } else {
        ISRAELI_TAX.purchase_additional_property
    };
    progressive_tax(price, brackets)
}

fn progressive_tax(amount: f64, brackets: &[PurchaseTaxBracket]) -> f64 {
    let mut tax = 0.0;
    let mut previous_limit = 0.0;

    for bracket in brackets {
        if amount <= previous_limit {
            break;
        }
        let taxable_in_bracket = amount.min(bracket.up_to) - previous_limit;
        if taxable_in_bracket > 0.0 {
            tax += taxable_in_bracket * bracket.rate;
        }
        previous_limit = bracket.up_to;
    }

    tax
}

pub fn rental_tax(annual_income: f64, track: RentalTaxTrack) -> f64 {
    if annual_income <= 0.0 {
        return 0.0;
    }

    match track {
        RentalTaxTrack::None | RentalTaxTrack::Other => 0.0,
        RentalTaxTrack::Exempt => {
            let threshold = ISRAELI_TAX.rental_exempt_monthly_threshold;
            if annual_income / 12.0 <= threshold {
                0.0
            } else {
                (annual_income - threshold * 12.0) * ISRAELI_TAX.rental_min_marginal_rate
            }
        }
        RentalTaxTrack::TenPercent => annual_income * ISRAELI_TAX.rental_flat_rate,
        RentalTaxTrack::Marginal => annual_income * ISRAELI_TAX.rental_min_marginal_rate,
    }
}

pub fn real_estate_capital_gains_tax(appreciation: f64) -> f64 {
    if appreciation <= 0.0 {
        return 0.0;
    }
    appreciation * ISRAELI_TAX.real_estate_capital_gains
}
