//! Currency formatting for receipt amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Where the currency symbol sits relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    Prefix,
    Suffix,
}

struct CurrencySpec {
    code: &'static str,
    symbol: &'static str,
    position: SymbolPosition,
    minor_units: u32,
}

const CURRENCIES: &[CurrencySpec] = &[
    CurrencySpec { code: "AUD", symbol: "A$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "BRL", symbol: "R$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "CAD", symbol: "CA$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "CHF", symbol: "CHF ", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "CNY", symbol: "CN¥", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "DKK", symbol: " kr", position: SymbolPosition::Suffix, minor_units: 2 },
    CurrencySpec { code: "EUR", symbol: "€", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "GBP", symbol: "£", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "HKD", symbol: "HK$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "INR", symbol: "₹", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "JPY", symbol: "¥", position: SymbolPosition::Prefix, minor_units: 0 },
    CurrencySpec { code: "KRW", symbol: "₩", position: SymbolPosition::Prefix, minor_units: 0 },
    CurrencySpec { code: "MXN", symbol: "MX$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "NOK", symbol: " kr", position: SymbolPosition::Suffix, minor_units: 2 },
    CurrencySpec { code: "NZD", symbol: "NZ$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "PLN", symbol: " zł", position: SymbolPosition::Suffix, minor_units: 2 },
    CurrencySpec { code: "SEK", symbol: " kr", position: SymbolPosition::Suffix, minor_units: 2 },
    CurrencySpec { code: "SGD", symbol: "S$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "USD", symbol: "$", position: SymbolPosition::Prefix, minor_units: 2 },
    CurrencySpec { code: "ZAR", symbol: "R", position: SymbolPosition::Prefix, minor_units: 2 },
];

/// Format an amount for display under the given ISO 4217 currency code.
///
/// An empty or unrecognized code falls back to a plain grouped number, and
/// an absent amount formats as zero. Formatting never fails.
pub fn format_amount(amount: Option<Decimal>, currency_code: &str) -> String {
    let amount = amount.unwrap_or_default();
    let sign = if amount.is_sign_negative() { "-" } else { "" };

    match currency_spec(currency_code) {
        Some(spec) => {
            let number = grouped(amount.abs(), spec.minor_units);
            match spec.position {
                SymbolPosition::Prefix => format!("{}{}{}", sign, spec.symbol, number),
                SymbolPosition::Suffix => format!("{}{}{}", sign, number, spec.symbol),
            }
        }
        None => format!("{}{}", sign, grouped(amount.abs(), 2)),
    }
}

fn currency_spec(code: &str) -> Option<&'static CurrencySpec> {
    let code = code.trim().to_ascii_uppercase();
    CURRENCIES.iter().find(|spec| spec.code == code)
}

/// Render a non-negative amount with thousands grouping and a fixed number
/// of decimal places.
fn grouped(amount: Decimal, minor_units: u32) -> String {
    let rounded = amount.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero);
    let rendered = format!("{:.*}", minor_units as usize, rounded);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
