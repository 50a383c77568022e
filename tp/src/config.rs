//! Planner configuration types and loading
//!
//! Every hand-tuned constant in the pipeline lives here rather than in the
//! algorithms: daily caps, the transport reserve, the fullness slack, the
//! high-duration ratio, the balance bands, and the repair limits.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{BalanceStatus, DiningTier, Group};

/// Main planner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Daily time caps and the transport reserve
    pub time: TimeBudgetConfig,

    /// Allocation thresholds
    pub allocation: AllocationConfig,

    /// Budget repair limits
    pub repair: RepairConfig,

    /// Dining tier rates
    pub dining: DiningConfig,

    /// Routing lookup behavior
    pub routing: RoutingConfig,
}

impl PlannerConfig {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripplan.yml
        let local_config = PathBuf::from(".tripplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripplan/tripplan.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripplan").join("tripplan.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Daily time caps and the transport reserve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBudgetConfig {
    /// Daily cap in hours for adult-only groups
    #[serde(rename = "adult-daily-cap-hours")]
    pub adult_daily_cap_hours: f64,

    /// Daily cap in hours when the group includes children or elderly
    #[serde(rename = "mixed-daily-cap-hours")]
    pub mixed_daily_cap_hours: f64,

    /// Hours held back from the cap for transport between stops
    #[serde(rename = "transport-reserve-hours")]
    pub transport_reserve_hours: f64,
}

impl Default for TimeBudgetConfig {
    fn default() -> Self {
        Self {
            adult_daily_cap_hours: 12.0,
            mixed_daily_cap_hours: 9.0,
            transport_reserve_hours: 2.5,
        }
    }
}

impl TimeBudgetConfig {
    /// Total daily hours (POI time plus transport) for this group
    pub fn daily_cap(&self, group: &Group) -> f64 {
        if group.has_children_or_elderly() {
            self.mixed_daily_cap_hours
        } else {
            self.adult_daily_cap_hours
        }
    }

    /// Hours available for POIs alone
    pub fn poi_budget(&self, group: &Group) -> f64 {
        (self.daily_cap(group) - self.transport_reserve_hours).max(0.0)
    }
}

/// Allocation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// A day whose compatible POI pool leaves more than this many hours
    /// unused is considered too sparse to plan
    #[serde(rename = "slack-threshold-hours")]
    pub slack_threshold_hours: f64,

    /// A POI at or above this share of the POI budget is high-duration
    #[serde(rename = "high-duration-ratio")]
    pub high_duration_ratio: f64,

    /// Stop filling a day once remaining capacity drops below this
    #[serde(rename = "fill-stop-hours")]
    pub fill_stop_hours: f64,

    /// Preferred distance to a day's centroid when clustering
    #[serde(rename = "cluster-radius-km")]
    pub cluster_radius_km: f64,

    /// Utilization bands
    pub bands: BalanceBands,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            slack_threshold_hours: 5.0,
            high_duration_ratio: 0.6,
            fill_stop_hours: 2.0,
            cluster_radius_km: 15.0,
            bands: BalanceBands::default(),
        }
    }
}

/// Utilization band boundaries (fractions of the POI budget)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceBands {
    #[serde(rename = "too-little")]
    pub too_little: f64,
    pub light: f64,
    pub reasonable: f64,
    pub tight: f64,
}

impl Default for BalanceBands {
    fn default() -> Self {
        Self {
            too_little: 0.5,
            light: 0.6,
            reasonable: 0.9,
            tight: 1.1,
        }
    }
}

impl BalanceBands {
    /// Classify a day's utilization
    pub fn classify(&self, utilization: f64) -> BalanceStatus {
        if utilization < self.too_little {
            BalanceStatus::TooLittle
        } else if utilization < self.light {
            BalanceStatus::Light
        } else if utilization <= self.reasonable {
            BalanceStatus::Reasonable
        } else if utilization <= self.tight {
            BalanceStatus::Tight
        } else {
            BalanceStatus::TooMuch
        }
    }
}

/// Budget repair limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Maximum lodging swap attempts before the axis blocks
    #[serde(rename = "max-lodging-attempts")]
    pub max_lodging_attempts: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self { max_lodging_attempts: 3 }
    }
}

/// Dining tier rates, per person per day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiningConfig {
    #[serde(rename = "comfort-daily-rate")]
    pub comfort_daily_rate: f64,

    #[serde(rename = "standard-daily-rate")]
    pub standard_daily_rate: f64,

    #[serde(rename = "budget-daily-rate")]
    pub budget_daily_rate: f64,
}

impl Default for DiningConfig {
    fn default() -> Self {
        Self {
            comfort_daily_rate: 150.0,
            standard_daily_rate: 90.0,
            budget_daily_rate: 50.0,
        }
    }
}

impl DiningConfig {
    /// Per-person per-day rate for a tier
    pub fn daily_rate(&self, tier: DiningTier) -> f64 {
        match tier {
            DiningTier::Comfort => self.comfort_daily_rate,
            DiningTier::Standard => self.standard_daily_rate,
            DiningTier::Budget => self.budget_daily_rate,
        }
    }
}

/// Routing lookup behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Delay between per-leg routing lookups, for rate-limited providers
    #[serde(rename = "call-delay-ms")]
    pub call_delay_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { call_delay_ms: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.time.adult_daily_cap_hours, 12.0);
        assert_eq!(config.time.mixed_daily_cap_hours, 9.0);
        assert_eq!(config.allocation.slack_threshold_hours, 5.0);
        assert_eq!(config.repair.max_lodging_attempts, 3);
    }

    #[test]
    fn test_daily_cap_by_group() {
        let time = TimeBudgetConfig::default();

        assert_eq!(time.daily_cap(&Group::new(2, 0, 0)), 12.0);
        assert_eq!(time.daily_cap(&Group::new(2, 1, 0)), 9.0);
        assert_eq!(time.daily_cap(&Group::new(2, 0, 1)), 9.0);

        assert_eq!(time.poi_budget(&Group::new(2, 0, 0)), 9.5);
        assert_eq!(time.poi_budget(&Group::new(1, 1, 0)), 6.5);
    }

    #[test]
    fn test_band_classification() {
        let bands = BalanceBands::default();

        assert_eq!(bands.classify(0.3), BalanceStatus::TooLittle);
        assert_eq!(bands.classify(0.55), BalanceStatus::Light);
        assert_eq!(bands.classify(0.75), BalanceStatus::Reasonable);
        assert_eq!(bands.classify(0.9), BalanceStatus::Reasonable);
        assert_eq!(bands.classify(1.0), BalanceStatus::Tight);
        assert_eq!(bands.classify(1.2), BalanceStatus::TooMuch);
    }

    #[test]
    fn test_dining_rates_ordered() {
        let dining = DiningConfig::default();
        assert!(dining.daily_rate(DiningTier::Comfort) > dining.daily_rate(DiningTier::Standard));
        assert!(dining.daily_rate(DiningTier::Standard) > dining.daily_rate(DiningTier::Budget));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
time:
  adult-daily-cap-hours: 11.0
  mixed-daily-cap-hours: 8.0
  transport-reserve-hours: 3.0

allocation:
  slack-threshold-hours: 4.0
  cluster-radius-km: 10.0

repair:
  max-lodging-attempts: 2
"#;

        let config: PlannerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.time.adult_daily_cap_hours, 11.0);
        assert_eq!(config.time.transport_reserve_hours, 3.0);
        assert_eq!(config.allocation.slack_threshold_hours, 4.0);
        assert_eq!(config.allocation.cluster_radius_km, 10.0);
        assert_eq!(config.repair.max_lodging_attempts, 2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
repair:
  max-lodging-attempts: 5
"#;

        let config: PlannerConfig = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.repair.max_lodging_attempts, 5);

        // Defaults for unspecified
        assert_eq!(config.time.adult_daily_cap_hours, 12.0);
        assert_eq!(config.allocation.high_duration_ratio, 0.6);
    }

    #[test]
    fn test_load_from_explicit_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time:\n  transport-reserve-hours: 2.0").unwrap();

        let path = file.path().to_path_buf();
        let config = PlannerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.time.transport_reserve_hours, 2.0);
    }
}
