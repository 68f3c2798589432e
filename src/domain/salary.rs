use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MONTHS_PER_YEAR: i64 = 12;

/// Largest magnitude accepted for a single amount. Sums and yearly figures
/// built from amounts within this bound stay far inside `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Empty or unparsable input counts as zero.
pub fn parse_amount(raw: &str) -> Decimal {
    parse_present_amount(raw).unwrap_or(Decimal::ZERO)
}

/// `None` when the field was left blank, does not parse or exceeds
/// [`MAX_AMOUNT`].
pub fn parse_present_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .filter(|amount| amount.abs() <= Decimal::from(MAX_AMOUNT))
}

/// Monthly components as typed into the salary section of a form.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonthlyInputs {
    pub basic_monthly: String,
    pub hra_monthly: String,
    pub conveyance_monthly: String,
    pub medical_monthly: String,
    pub pf_monthly: String,
    pub incentives: String,
    pub other_monthly: String,
}

/// Monthly amounts per component. Negative values are kept as entered.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalaryBreakdown {
    pub basic: Decimal,
    pub hra: Decimal,
    pub conveyance: Decimal,
    pub medical: Decimal,
    pub pf: Decimal,
    pub incentives: Decimal,
    pub other: Decimal,
}

impl SalaryBreakdown {
    pub fn from_monthly_inputs(inputs: &MonthlyInputs) -> Self {
        Self {
            basic: parse_amount(&inputs.basic_monthly),
            hra: parse_amount(&inputs.hra_monthly),
            conveyance: parse_amount(&inputs.conveyance_monthly),
            medical: parse_amount(&inputs.medical_monthly),
            pf: parse_amount(&inputs.pf_monthly),
            incentives: parse_amount(&inputs.incentives),
            other: parse_amount(&inputs.other_monthly),
        }
    }

    pub fn components(&self) -> [(&'static str, Decimal); 7] {
        [
            ("basic", self.basic),
            ("hra", self.hra),
            ("conveyance", self.conveyance),
            ("medical", self.medical),
            ("pf", self.pf),
            ("incentives", self.incentives),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.components()
            .iter()
            .fold(Decimal::ZERO, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    fn map(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            basic: f(self.basic),
            hra: f(self.hra),
            conveyance: f(self.conveyance),
            medical: f(self.medical),
            pf: f(self.pf),
            incentives: f(self.incentives),
            other: f(self.other),
        }
    }
}

/// Operator-entered CTC figures plus the monthly breakdown. The CTC figures
/// are not derived from the breakdown and may disagree with it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Salary {
    pub annual_ctc: Decimal,
    pub monthly_ctc: Decimal,
    pub breakdown: SalaryBreakdown,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct SalaryRollup {
    pub monthly: SalaryBreakdown,
    pub annual: SalaryBreakdown,
    pub monthly_total: Decimal,
    pub annual_total: Decimal,
    pub monthly_ctc: Decimal,
    pub annual_ctc: Decimal,
    /// `monthly_ctc - monthly_total`, reported for display only.
    pub ctc_gap: Decimal,
}

pub fn annualize(monthly: &SalaryBreakdown) -> SalaryBreakdown {
    monthly.map(|amount| amount.saturating_mul(Decimal::from(MONTHS_PER_YEAR)))
}

pub fn rollup(salary: &Salary) -> SalaryRollup {
    let annual = annualize(&salary.breakdown);
    let monthly_total = salary.breakdown.total();
    SalaryRollup {
        monthly: salary.breakdown,
        annual,
        monthly_total,
        annual_total: annual.total(),
        monthly_ctc: salary.monthly_ctc,
        annual_ctc: salary.annual_ctc,
        ctc_gap: salary.monthly_ctc.saturating_sub(monthly_total),
    }
}
