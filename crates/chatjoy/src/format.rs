//! Number and message formatting for chat replies

use crate::snapshot::StockSnapshot;
use crate::ticker::Currency;

/// Group the integer part by thousands with a fixed number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0" after rounding is just "0"
    let is_negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if is_negative { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `$1,234.56` or `₩1,234`
pub fn format_money(value: f64, currency: Currency) -> String {
    let (symbol, decimals) = match currency {
        Currency::Usd => ("$", 2),
        Currency::Krw => ("₩", 0),
    };
    let number = format_number(value, decimals);
    match number.strip_prefix('-') {
        Some(abs) => format!("-{symbol}{abs}"),
        None => format!("{symbol}{number}"),
    }
}

/// Signed percentage with one decimal, `+1.2%`
pub fn format_change(pct: f64) -> String {
    format!("{pct:+.1}%")
}

pub fn format_optional(value: Option<f64>, f: impl FnOnce(f64) -> String) -> String {
    value.map_or_else(|| "N/A".to_string(), f)
}

/// Ratio such as PER/PBR, `-` when absent
pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn format_market_cap(snapshot: &StockSnapshot) -> String {
    let (value, unit) = snapshot.market_cap_display();
    format!("{} {unit}", format_number(value, 1))
}

/// The "기본 정보" block shown before the AI commentary
pub fn basic_info(snapshot: &StockSnapshot) -> String {
    let money = |v: f64| format_money(v, snapshot.currency);
    format!(
        "**📊 기본 정보**\n\
         {name} ({ticker})\n\
         현재가: {price} ({change})\n\
         시가총액: {cap}\n\
         52주 범위: {low} ~ {high}\n\
         RSI: {rsi}\n",
        name = snapshot.name,
        ticker = snapshot.ticker,
        price = money(snapshot.price),
        change = format_change(snapshot.change_pct),
        cap = format_market_cap(snapshot),
        low = money(snapshot.low_52w),
        high = money(snapshot.high_52w),
        rsi = format_optional(snapshot.indicators.rsi14, |v| format!("{v:.1}")),
    )
}
