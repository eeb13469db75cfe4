use super::inflation::monthly_inflation_rate;

/// Fixed monthly payment of an amortizing loan.
pub fn pmt(principal: f64, annual_rate: f64, years: u32) -> f64 {
    if principal <= 0.0 || years == 0 {
        return 0.0;
    }
    let n = (years * 12) as f64;
    if annual_rate <= 0.0 {
        return principal / n;
    }

    let r = annual_rate / 100.0 / 12.0;
    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// Outstanding balance of a fixed-rate loan after `at_month` payments.
pub fn remaining_balance(principal: f64, annual_rate: f64, years: u32, at_month: u32) -> f64 {
    if principal <= 0.0 {
        return 0.0;
    }
    if at_month == 0 {
        return principal;
    }

    let n = years * 12;
    if at_month >= n {
        return 0.0;
    }

    if annual_rate <= 0.0 {
        let monthly_payment = principal / n as f64;
        return (principal - monthly_payment * at_month as f64).max(0.0);
    }

    let r = annual_rate / 100.0 / 12.0;
    let total_growth = (1.0 + r).powf(n as f64);
    let elapsed_growth = (1.0 + r).powf(at_month as f64);
    principal * (total_growth - elapsed_growth) / (total_growth - 1.0)
}

/// Fixed-rate, non-indexed track. Balances are evaluated in closed form on
/// demand.
#[derive(Debug, Clone, Copy)]
pub struct NonLinkedTrack {
    principal: f64,
    annual_rate: f64,
    years: u32,
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

impl NonLinkedTrack {
    pub fn new(principal: f64, annual_rate: f64, years: u32) -> Self {
        let monthly_payment = pmt(principal, annual_rate, years);
        let total_paid = monthly_payment * (years * 12) as f64;
        Self {
            principal,
            annual_rate,
            years,
            monthly_payment,
            total_paid,
            total_interest: total_paid - principal,
        }
    }

    pub fn term_months(&self) -> u32 {
        self.years * 12
    }

    pub fn balance_at_month(&self, month: u32) -> f64 {
        remaining_balance(self.principal, self.annual_rate, self.years, month)
    }

    pub fn payment_at_month(&self, month: u32) -> f64 {
        if month > self.term_months() {
            0.0
        } else {
            self.monthly_payment
        }
    }
}

/// CPI-linked track. Both the balance and the payment are indexed monthly,
/// so the schedule is simulated once and every balance is kept.
#[derive(Debug, Clone)]
pub struct CpiLinkedTrack {
    principal: f64,
    term_months: u32,
    monthly_inflation: f64,
    /// Payment in time-zero terms.
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    balances: Vec<f64>,
}

impl CpiLinkedTrack {
    pub fn simulate(principal: f64, annual_rate: f64, years: u32, annual_inflation: f64) -> Self {
        let r = annual_rate / 100.0 / 12.0;
        let term_months = years * 12;
        let monthly_inflation = monthly_inflation_rate(annual_inflation);
        let base_payment = pmt(principal, annual_rate, years);

        let mut balance = principal;
        let mut total_paid = 0.0;
        let mut balances = Vec::with_capacity(term_months as usize + 1);
        balances.push(principal);

        for month in 1..=term_months {
            balance *= 1.0 + monthly_inflation;
            let interest = balance * r;
            let payment = base_payment * (1.0 + monthly_inflation).powi(month as i32);
            let principal_portion = payment - interest;

            balance = (balance - principal_portion).max(0.0);
            total_paid += payment;
            balances.push(balance);
        }

        Self {
            principal,
            term_months,
            monthly_inflation,
            monthly_payment: base_payment,
            total_paid,
            total_interest: total_paid - principal,
            balances,
        }
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn balance_at_month(&self, month: u32) -> f64 {
        if month == 0 {
            return self.principal;
        }
        if month >= self.term_months {
            return 0.0;
        }
        self.balances.get(month as usize).copied().unwrap_or(0.0)
    }

    pub fn payment_at_month(&self, month: u32) -> f64 {
        if month > self.term_months {
            return 0.0;
        }
        self.monthly_payment * (1.0 + self.monthly_inflation).powi(month as i32)
    }
}

/// Two parallel tracks, each with its own term, combined month by month.
#[derive(Debug, Clone)]
pub struct FullMortgage {
    pub non_linked: NonLinkedTrack,
    pub cpi_linked: CpiLinkedTrack,
    pub initial_monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

impl FullMortgage {
    pub fn new(
        total_principal: f64,
        cpi_linked_percent: f64,
        non_linked_rate: f64,
        cpi_linked_rate: f64,
        non_linked_years: u32,
        cpi_linked_years: u32,
        annual_inflation: f64,
    ) -> Self {
        let cpi_principal = total_principal * (cpi_linked_percent / 100.0);
        let non_linked_principal = total_principal - cpi_principal;

        let non_linked = NonLinkedTrack::new(non_linked_principal, non_linked_rate, non_linked_years);
        let cpi_linked = CpiLinkedTrack::simulate(
            cpi_principal,
            cpi_linked_rate,
            cpi_linked_years,
            annual_inflation,
        );

        Self {
            initial_monthly_payment: non_linked.monthly_payment + cpi_linked.monthly_payment,
            total_paid: non_linked.total_paid + cpi_linked.total_paid,
            total_interest: non_linked.total_interest + cpi_linked.total_interest,
            non_linked,
            cpi_linked,
        }
    }

    pub fn payment_at_month(&self, month: u32) -> f64 {
        self.non_linked.payment_at_month(month) + self.cpi_linked.payment_at_month(month)
    }

    pub fn balance_at_month(&self, month: u32) -> f64 {
        self.non_linked.balance_at_month(month) + self.cpi_linked.balance_at_month(month)
    }

    /// Sum of scheduled payments falling in months `12*(year-1)+1 ..= 12*year`.
    pub fn paid_during_year(&self, year: u32) -> f64 {
        if year == 0 {
            return 0.0;
        }
        ((year - 1) * 12 + 1..=year * 12)
            .map(|month| self.payment_at_month(month))
            .sum()
    }
}
