use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Kolkata;
use rust_decimal::{Decimal, RoundingStrategy};

/// Calendar date in the portal's single locale (India).
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&Kolkata).date_naive()
}

/// en-IN currency display: `₹8,50,000.00`. Groups are 3 digits for the
/// lowest group and 2 digits above it.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = group_indian(whole);
    let sign = if negative { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction}")
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `15 January 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}
