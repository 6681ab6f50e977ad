use crate::error::ConfigError;
use core_types::{ExchangeRate, MilestoneTarget};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Number of podium places shown above the leaderboard table.
pub const PODIUM_SIZE: usize = 3;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ranking: Ranking,
    pub monthly: Monthly,
    pub storage: Storage,
}

/// Contains the parameters that shape the leaderboard ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ranking {
    /// DOP per USD, used to seed a fresh data directory.
    pub exchange_rate: ExchangeRate,
    /// The metric the leaderboard is ordered by.
    pub sort_key: SortKey,
    /// When non-empty, podium places are awarded by crossing these thresholds
    /// (highest first) instead of by plain position.
    pub milestone_targets: Vec<MilestoneTarget>,
}

/// Contains the parameters of the monthly revenue report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monthly {
    /// Number of trailing calendar months, including the current one.
    pub window_months: u32,
    /// The smallest ceiling the chart axis may have.
    pub axis_floor: Decimal,
}

/// Where the store and transaction documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub data_dir: PathBuf,
}

/// The leaderboard ordering metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Total revenue in the reference currency.
    #[default]
    Revenue,
    /// Number of orders.
    Orders,
    /// Reference revenue per day since the store registered.
    Growth,
}

impl Default for Ranking {
    fn default() -> Self {
        Self {
            exchange_rate: ExchangeRate::default(),
            sort_key: SortKey::default(),
            milestone_targets: Vec::new(),
        }
    }
}

impl Default for Monthly {
    fn default() -> Self {
        Self {
            window_months: 12,
            axis_floor: dec!(1000),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".leaderboard"),
        }
    }
}

impl Config {
    /// Rejects settings that would silently produce wrong figures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monthly.window_months == 0 {
            return Err(ConfigError::ValidationError(
                "monthly.window_months must be at least 1".to_string(),
            ));
        }
        if self.monthly.axis_floor < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "monthly.axis_floor must not be negative, got {}",
                self.monthly.axis_floor
            )));
        }
        self.ranking.validate_milestones()
    }
}

impl Ranking {
    fn validate_milestones(&self) -> Result<(), ConfigError> {
        let targets = &self.milestone_targets;
        if targets.len() > PODIUM_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "at most {} milestone targets are allowed, got {}",
                PODIUM_SIZE,
                targets.len()
            )));
        }
        for target in targets {
            if target.label.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "milestone targets need a label".to_string(),
                ));
            }
            if target.threshold < Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "milestone '{}' has a negative threshold",
                    target.label
                )));
            }
        }
        if let Some(pair) = targets.windows(2).find(|w| w[0].threshold <= w[1].threshold) {
            return Err(ConfigError::ValidationError(format!(
                "milestone thresholds must be strictly descending: '{}' ({}) is followed by '{}' ({})",
                pair[0].label, pair[0].threshold, pair[1].label, pair[1].threshold
            )));
        }
        Ok(())
    }

    /// The three standard milestones: 10M, 5M and 1M in the reference currency.
    pub fn default_milestones() -> Vec<MilestoneTarget> {
        vec![
            MilestoneTarget::new("Diamond", dec!(10000000)),
            MilestoneTarget::new("Gold", dec!(5000000)),
            MilestoneTarget::new("Silver", dec!(1000000)),
        ]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Revenue => write!(f, "revenue"),
            SortKey::Orders => write!(f, "orders"),
            SortKey::Growth => write!(f, "growth"),
        }
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" | "performance" => Ok(SortKey::Revenue),
            "orders" => Ok(SortKey::Orders),
            "growth" => Ok(SortKey::Growth),
            other => Err(ConfigError::ValidationError(format!(
                "unknown sort key '{}'. Expected: revenue, orders, growth",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.ranking.sort_key, SortKey::Revenue);
        assert_eq!(config.ranking.exchange_rate.as_decimal(), dec!(60.50));
        assert_eq!(config.monthly.window_months, 12);
        assert!(config.ranking.milestone_targets.is_empty());
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let mut config = Config::default();
        config.monthly.window_months = 0;

        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_negative_axis_floor_is_rejected() {
        let mut config = Config::default();
        config.monthly.axis_floor = dec!(-1);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_milestones_are_valid() {
        let mut config = Config::default();
        config.ranking.milestone_targets = Ranking::default_milestones();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_milestones_must_descend() {
        let mut config = Config::default();
        config.ranking.milestone_targets = vec![
            MilestoneTarget::new("Gold", dec!(5000000)),
            MilestoneTarget::new("Diamond", dec!(10000000)),
        ];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_milestones_are_rejected() {
        let mut config = Config::default();
        config.ranking.milestone_targets = vec![
            MilestoneTarget::new("A", dec!(4)),
            MilestoneTarget::new("B", dec!(3)),
            MilestoneTarget::new("C", dec!(2)),
            MilestoneTarget::new("D", dec!(1)),
        ];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("Growth".parse::<SortKey>().unwrap(), SortKey::Growth);
        assert_eq!("performance".parse::<SortKey>().unwrap(), SortKey::Revenue);
        assert!("speed".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Orders.to_string(), "orders");
    }
}
