use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a decimal with two fraction digits and thousands separators.
///
/// Rounds half away from zero. A negative value keeps its minus sign even when it
/// rounds to zero.
///
/// # Example
///
/// ```
/// let s = format_number(dec!(1234567.891));
/// assert_eq!(s, "1,234,567.89");
/// ```
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < Decimal::ZERO {
        grouped.push('-');
    }

    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}

/// 非負值前面加上 `+`，負值由數字本身帶出負號
pub fn sign_for(change: Decimal) -> &'static str {
    if change >= Decimal::ZERO {
        "+"
    } else {
        ""
    }
}

/// 帶正負號的數值，符號依據 `change` 決定
pub fn format_signed(value: Decimal, change: Decimal) -> String {
    format!("{}{}", sign_for(change), format_number(value))
}

/// 漲跌箭頭與漲跌幅，例︰▲ +12.34 (+0.27%)
pub fn format_change(change: Decimal, percent: Decimal) -> String {
    let arrow = if change >= Decimal::ZERO { '▲' } else { '▼' };
    format!(
        "{arrow} {change} ({percent}%)",
        arrow = arrow,
        change = format_signed(change, change),
        percent = format_signed(percent, change)
    )
}
