//! Savings goals typed as free text, e.g. "quero economizar 200 reais por mês"
//! or "save 5 per day".

use serde::{Deserialize, Serialize};

/// Days per month used to convert between daily and monthly targets
pub const DAYS_PER_MONTH: f64 = 30.0;

const MONTH_WORDS: &[&str] = &["mês", "mes", "mensal", "month"];
const DAY_WORDS: &[&str] = &["dia", "diário", "diaria", "day", "daily"];

/// A parsed savings goal, amounts rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub raw: String,
    pub monthly_target: f64,
    pub daily_target: f64,
}

/// Parse a savings goal. The first number in the text is the amount; it is
/// read as a daily amount when the text names a day but no month, and as a
/// monthly amount otherwise. Returns `None` when no number is present.
pub fn parse_goal(text: &str) -> Option<SavingsGoal> {
    let lower = text.trim().to_lowercase();
    let amount = first_number(&lower)?;

    let per_month = MONTH_WORDS.iter().any(|w| lower.contains(w));
    let per_day = DAY_WORDS.iter().any(|w| lower.contains(w));

    let (daily, monthly) = if per_day && !per_month {
        (amount, amount * DAYS_PER_MONTH)
    } else {
        (amount / DAYS_PER_MONTH, amount)
    };

    Some(SavingsGoal {
        raw: text.to_string(),
        monthly_target: round_cents(monthly),
        daily_target: round_cents(daily),
    })
}

/// Digits, optionally followed by one `.` or `,` decimal separator and more digits.
fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];

    let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let mut number = rest[..int_len].to_string();

    let after = &rest[int_len..];
    if let Some(frac) = after.strip_prefix(['.', ',']) {
        let frac_len = frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
        if frac_len > 0 {
            number.push('.');
            number.push_str(&frac[..frac_len]);
        }
    }

    number.parse().ok()
}

pub(crate) fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
