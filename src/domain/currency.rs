//! Currency reference records.

use serde::Serialize;

pub const USD: &str = "USD";
pub const EUR: &str = "EUR";
pub const JPY: &str = "JPY";
pub const ILS: &str = "ILS";
pub const AUD: &str = "AUD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl Currency {
    pub fn new(code: &str, name: &str, symbol: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Canonical form of a user-supplied currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// The currencies known to the service at startup.
pub fn standard_currencies() -> Vec<Currency> {
    vec![
        Currency::new(USD, "United States Dollar", "$"),
        Currency::new(EUR, "Euro", "€"),
        Currency::new(JPY, "Japanese Yen", "¥"),
        Currency::new(ILS, "Israeli shekel", "₪"),
        Currency::new(AUD, "Australian Dollar", "A$"),
    ]
}
