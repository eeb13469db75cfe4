/// Convert a nominal value `years` into the future to today's purchasing power.
pub fn adjust_for_inflation(nominal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    nominal / inflation_factor(annual_rate_percent, years)
}

pub fn inflation_factor(annual_rate_percent: f64, years: u32) -> f64 {
    (1.0 + annual_rate_percent / 100.0).powi(years as i32)
}

/// Monthly rate that compounds to the given annual rate over twelve months.
pub fn monthly_inflation_rate(annual_rate_percent: f64) -> f64 {
    (1.0 + annual_rate_percent / 100.0).powf(1.0 / 12.0) - 1.0
}
