//! Lodging, dining, and cost breakdown types

use serde::{Deserialize, Serialize};

use super::poi::Coordinate;
use super::transport::StrategyKind;

/// One lodging option from the (single) lodging search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodgingOption {
    pub name: String,
    pub rating: f64,
    pub room_type: String,
    pub price_per_night: f64,
    pub location: Coordinate,
}

/// Dining spend level; repair steps down one tier at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiningTier {
    Comfort,
    Standard,
    Budget,
}

impl DiningTier {
    /// The next cheaper tier, None at the floor
    pub fn next_cheaper(&self) -> Option<DiningTier> {
        match self {
            Self::Comfort => Some(Self::Standard),
            Self::Standard => Some(Self::Budget),
            Self::Budget => None,
        }
    }
}

impl std::fmt::Display for DiningTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comfort => write!(f, "comfort"),
            Self::Standard => write!(f, "standard"),
            Self::Budget => write!(f, "budget"),
        }
    }
}

/// Priced plan under one transport strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub strategy: StrategyKind,

    /// Ticket prices times travelers, over all allocated POIs
    pub tickets: f64,

    /// Price per night times rooms times nights
    pub lodging: f64,

    /// Transit legs scaled by travelers, taxi legs per vehicle
    pub transport: f64,

    /// Dining tier rate times travelers times trip days
    pub dining: f64,

    pub grand_total: f64,
    pub within_budget: bool,
}

impl CostBreakdown {
    /// Amount over the limit, 0.0 when within budget
    pub fn overage(&self, limit: f64) -> f64 {
        (self.grand_total - limit).max(0.0)
    }
}
