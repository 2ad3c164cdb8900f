//! Savings and out-of-pocket figures for a program.
//!
//! Catalog caps are free text (`"$1,200"`, `"Up to $5,000/yr"`), so the saving
//! is a best-effort extraction that never fails: a cap without digits saves
//! nothing.

use serde::{Deserialize, Serialize};

use crate::{Money, patient_drugs::PatientDrug, programs::Program};

/// The three figures of a program's cost panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    pub yearly_drug_cost: Money,
    pub potential_saving: Money,
    pub out_of_pocket: Money,
}

impl CostSummary {
    #[must_use]
    pub fn compute(program: &Program, patient_drug: Option<&PatientDrug>) -> Self {
        Self {
            yearly_drug_cost: patient_drug.map_or(Money::ZERO, |drug| drug.yearly_price),
            potential_saving: potential_saving(program),
            out_of_pocket: out_of_pocket_cost(program, patient_drug),
        }
    }
}

/// Amount of the yearly drug cost the program may cover.
#[must_use]
pub fn potential_saving(program: &Program) -> Money {
    parse_monetary_cap(&program.monetary_cap)
}

/// Yearly drug cost left to the patient, never below zero.
#[must_use]
pub fn out_of_pocket_cost(program: &Program, patient_drug: Option<&PatientDrug>) -> Money {
    let Some(drug) = patient_drug else {
        return Money::ZERO;
    };
    drug.yearly_price
        .saturating_sub(potential_saving(program))
        .max(Money::ZERO)
}

/// Extracts an amount from a free-text cap.
///
/// Everything but ASCII digits and `.` is dropped, then the leading
/// `digits[.digits]` run is read and rounded half-up to cents. A second `.`
/// ends the number, so `"1.200.50"` reads as `1.20`.
#[must_use]
pub fn parse_monetary_cap(raw: &str) -> Money {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let (whole, rest) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    let fraction = rest.split('.').next().unwrap_or("");
    if whole.is_empty() && fraction.is_empty() {
        return Money::ZERO;
    }

    let mut cents = whole
        .bytes()
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        })
        .saturating_mul(100);

    let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    cents = cents.saturating_add(tenths * 10 + hundredths);
    if digits.next().is_some_and(|d| d >= 5) {
        cents = cents.saturating_add(1);
    }

    Money::new(cents)
}
