//! Transport legs, modes, and whole-trip strategies

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transport mode for one leg
///
/// Transit costs are per person; taxi costs are per vehicle. The budget
/// optimizer applies the scaling, the pricer keeps raw quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Transit,
    Taxi,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transit => write!(f, "transit"),
            Self::Taxi => write!(f, "taxi"),
        }
    }
}

/// Travel time and cost for one mode on one leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeQuote {
    pub minutes: f64,
    pub cost: f64,
}

/// Both mode quotes for one leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegQuote {
    pub transit: ModeQuote,
    pub taxi: ModeQuote,
}

/// One leg of a day's chain with its chosen mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenLeg {
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub minutes: f64,
    /// Raw quote cost: per person for transit, per vehicle for taxi
    pub cost: f64,
}

/// Whole-trip mode-selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Minimum time per leg
    Fastest,
    /// Minimum cost per leg
    Cheapest,
    /// Taxi everywhere
    Comfort,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [Self::Fastest, Self::Cheapest, Self::Comfort];
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fastest => write!(f, "fastest"),
            Self::Cheapest => write!(f, "cheapest"),
            Self::Comfort => write!(f, "comfort"),
        }
    }
}

/// One day's legs under a strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRoute {
    pub date: NaiveDate,
    pub legs: Vec<ChosenLeg>,
    /// Total leg minutes for the day
    pub minutes: f64,
    /// Total raw leg cost for the day (unscaled)
    pub raw_cost: f64,
}

/// A whole-trip transport strategy with per-day and trip totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportStrategy {
    pub kind: StrategyKind,
    pub days: Vec<DayRoute>,
    pub total_minutes: f64,
    pub total_raw_cost: f64,
}

impl TransportStrategy {
    /// Leg minutes on the day at `index`, 0.0 past the end
    pub fn day_minutes(&self, index: usize) -> f64 {
        self.days.get(index).map(|d| d.minutes).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_display() {
        assert_eq!(StrategyKind::Fastest.to_string(), "fastest");
        assert_eq!(StrategyKind::Cheapest.to_string(), "cheapest");
        assert_eq!(StrategyKind::Comfort.to_string(), "comfort");
        assert_eq!(StrategyKind::ALL.len(), 3);
    }

    #[test]
    fn test_day_minutes_out_of_range() {
        let strategy = TransportStrategy {
            kind: StrategyKind::Comfort,
            days: vec![],
            total_minutes: 0.0,
            total_raw_cost: 0.0,
        };
        assert_eq!(strategy.day_minutes(3), 0.0);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&TransportMode::Transit).unwrap();
        assert_eq!(json, "\"transit\"");
    }
}
