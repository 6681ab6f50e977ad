use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The currency a store records its sales in.
///
/// `Dop` is the reference currency every cross-store comparison is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "DOP")]
    Dop,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// The currency all leaderboard figures are expressed in.
    pub const REFERENCE: Currency = Currency::Dop;

    pub fn is_reference(&self) -> bool {
        *self == Self::REFERENCE
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Dop => "DOP",
            Currency::Usd => "USD",
        }
    }

    /// Symbol used when printing amounts (`RD$` for pesos, `$` for dollars).
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Dop => "RD$",
            Currency::Usd => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DOP" => Ok(Currency::Dop),
            "USD" => Ok(Currency::Usd),
            other => Err(CoreError::InvalidInput(
                "currency".to_string(),
                format!("unsupported currency code '{}'", other),
            )),
        }
    }
}
