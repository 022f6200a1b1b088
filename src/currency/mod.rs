//! Local-currency previews and amount formatting.
//!
//! Rates are a fixed table quoted against USD; nothing here is fetched.

/// Units of a local currency per US dollar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyRate {
    pub code: &'static str,
    pub rate: f64,
    pub symbol: &'static str,
}

pub const MOCK_RATES: [CurrencyRate; 5] = [
    CurrencyRate {
        code: "NGN",
        rate: 1600.50,
        symbol: "₦",
    },
    CurrencyRate {
        code: "KES",
        rate: 130.20,
        symbol: "KSh",
    },
    CurrencyRate {
        code: "GHS",
        rate: 15.80,
        symbol: "GH₵",
    },
    CurrencyRate {
        code: "ZAR",
        rate: 18.90,
        symbol: "R",
    },
    CurrencyRate {
        code: "XOF",
        rate: 605.00,
        symbol: "CFA",
    },
];

/// A draft amount expressed in one local currency.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPreview {
    pub rate: CurrencyRate,
    pub amount: f64,
}

impl LocalPreview {
    pub fn label(&self) -> String {
        format!("{} {}", self.rate.code, format_grouped(self.amount, 2))
    }
}

/// Converts `usd` into every mocked local currency. A missing or
/// unparsable amount previews as zero.
pub fn preview(usd: Option<f64>) -> Vec<LocalPreview> {
    let usd = usd.filter(|value| value.is_finite()).unwrap_or_default();
    MOCK_RATES
        .iter()
        .map(|rate| LocalPreview {
            rate: *rate,
            amount: usd * rate.rate,
        })
        .collect()
}

/// Amounts closer than this are treated as equal.
pub const CENT_TOLERANCE: f64 = 1e-9;

/// Rounds to whole cents, dropping accumulated binary error.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `$1,234.50` style dollar amount.
pub fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_grouped(value.abs(), 2))
    } else {
        format!("${}", format_grouped(value, 2))
    }
}

/// Fixed-precision number with comma thousands grouping.
pub fn format_grouped(value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut grouped = String::with_capacity(body.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}
