//! Configuration system for CrewForge.
//!
//! Load planner configuration from TOML or YAML to control balancing,
//! equipment strategy and tuning without code changes. Every key has a
//! default, so an empty document is a valid configuration.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use crewforge_config::{OutfitStrategy, PlannerConfig};
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     balance_threshold = 3.5
//!     max_passes = 20
//!     outfit_strategy = "hybrid"
//!
//!     [room_priorities]
//!     MedBay = -1
//!
//!     [tuning]
//!     learning_window = 5
//! "#).unwrap();
//!
//! assert_eq!(config.balance_threshold, 3.5);
//! assert_eq!(config.outfit_strategy, OutfitStrategy::Hybrid);
//! assert_eq!(config.tuning.learning_window, 5);
//! assert_eq!(config.swap_aggressiveness, 1.0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use crewforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! assert_eq!(config.max_passes, 12);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crewforge_core::{Catalog, StationType};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Allowed absolute distance, in seconds, from the class mean.
    #[serde(alias = "balanceThreshold")]
    pub balance_threshold: f64,

    /// Upper bound on balancing passes.
    #[serde(alias = "maxPasses")]
    pub max_passes: u32,

    /// Extra weight on the urgent station's gain when scoring swaps (0.5-2.0).
    #[serde(alias = "swapAggressiveness")]
    pub swap_aggressiveness: f64,

    /// Relevant skill a worker needs to be placed in the first two greedy
    /// rounds. Zero disables the gate.
    #[serde(alias = "minSkillThreshold")]
    pub min_skill_threshold: u32,

    /// Equipment allocation strategy.
    #[serde(alias = "outfitStrategy")]
    pub outfit_strategy: OutfitStrategy,

    /// Search swap partners across classes; when off, only same-class
    /// best/worst exchanges are tried.
    #[serde(alias = "enableCrossSkillBalancing")]
    pub enable_cross_skill_balancing: bool,

    /// Station type name to urgency rank; lower is more urgent.
    #[serde(alias = "roomPriorities")]
    pub room_priorities: BTreeMap<String, i32>,

    /// Which snapshot improvement is reported against.
    #[serde(alias = "referenceBaseline")]
    pub reference_baseline: ReferenceBaseline,

    /// Swaps committed per balancing pass at most.
    pub max_swaps_per_pass: usize,

    /// Same-class mode: best/worst skill ratio required before swapping.
    pub same_skill_min_ratio: f64,

    /// `efficiency_first` stops below this bonus-to-total ratio.
    pub efficiency_floor: f64,

    /// `hybrid` weight on deficit (station order) and raw bonus (item pick).
    pub hybrid_deficit_weight: f64,

    /// Base of the level weight in station priority scores.
    pub level_weight_base: f64,

    /// Happiness is divided by this to get the morale factor.
    pub morale_divisor: f64,

    /// Adaptive tuning settings.
    pub tuning: TuningConfig,

    /// Custom catalog; the standard tables when absent.
    pub catalog: Option<Catalog>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            balance_threshold: 5.0,
            max_passes: 12,
            swap_aggressiveness: 1.0,
            min_skill_threshold: 0,
            outfit_strategy: OutfitStrategy::default(),
            enable_cross_skill_balancing: true,
            room_priorities: BTreeMap::new(),
            reference_baseline: ReferenceBaseline::default(),
            max_swaps_per_pass: 8,
            same_skill_min_ratio: 1.2,
            efficiency_floor: 0.6,
            hybrid_deficit_weight: 0.6,
            level_weight_base: 2.1,
            morale_divisor: 100.0,
            tuning: TuningConfig::default(),
            catalog: None,
        }
    }
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn with_balance_threshold(mut self, seconds: f64) -> Self {
        self.balance_threshold = seconds;
        self
    }

    pub fn with_max_passes(mut self, passes: u32) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn with_swap_aggressiveness(mut self, aggressiveness: f64) -> Self {
        self.swap_aggressiveness = aggressiveness;
        self
    }

    pub fn with_min_skill_threshold(mut self, threshold: u32) -> Self {
        self.min_skill_threshold = threshold;
        self
    }

    pub fn with_outfit_strategy(mut self, strategy: OutfitStrategy) -> Self {
        self.outfit_strategy = strategy;
        self
    }

    pub fn with_cross_skill_balancing(mut self, enabled: bool) -> Self {
        self.enable_cross_skill_balancing = enabled;
        self
    }

    /// Sets the urgency rank of one station type.
    pub fn with_room_priority(mut self, station_type: impl Into<String>, priority: i32) -> Self {
        self.room_priorities.insert(station_type.into(), priority);
        self
    }

    pub fn with_reference_baseline(mut self, baseline: ReferenceBaseline) -> Self {
        self.reference_baseline = baseline;
        self
    }

    pub fn with_max_swaps_per_pass(mut self, swaps: usize) -> Self {
        self.max_swaps_per_pass = swaps;
        self
    }

    pub fn with_morale_divisor(mut self, divisor: f64) -> Self {
        self.morale_divisor = divisor;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// The configured catalog, or the standard one.
    pub fn catalog(&self) -> Cow<'_, Catalog> {
        match &self.catalog {
            Some(catalog) => Cow::Borrowed(catalog),
            None => Cow::Owned(Catalog::standard()),
        }
    }

    /// Room priority overrides with station type names resolved.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a name that is not a station type.
    pub fn resolved_room_priorities(&self) -> Result<Vec<(StationType, i32)>, ConfigError> {
        self.room_priorities
            .iter()
            .map(|(name, priority)| {
                StationType::from_name(name)
                    .map(|ty| (ty, *priority))
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!("unknown station type '{}' in room_priorities", name))
                    })
            })
            .collect()
    }

    /// Checks value ranges.
    ///
    /// ```
    /// use crewforge_config::PlannerConfig;
    ///
    /// assert!(PlannerConfig::default().validate().is_ok());
    /// assert!(PlannerConfig::default().with_swap_aggressiveness(3.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(message: String) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(message))
        }

        if !(self.balance_threshold.is_finite() && self.balance_threshold >= 0.0) {
            return invalid(format!(
                "balance_threshold must be a non-negative number, got {}",
                self.balance_threshold
            ));
        }
        if self.max_passes == 0 {
            return invalid("max_passes must be at least 1".to_string());
        }
        if !(0.5..=2.0).contains(&self.swap_aggressiveness) {
            return invalid(format!(
                "swap_aggressiveness must be within 0.5-2.0, got {}",
                self.swap_aggressiveness
            ));
        }
        if self.max_swaps_per_pass == 0 {
            return invalid("max_swaps_per_pass must be at least 1".to_string());
        }
        if !(self.same_skill_min_ratio.is_finite() && self.same_skill_min_ratio >= 1.0) {
            return invalid(format!(
                "same_skill_min_ratio must be at least 1.0, got {}",
                self.same_skill_min_ratio
            ));
        }
        if !(0.0..=1.0).contains(&self.efficiency_floor) {
            return invalid(format!(
                "efficiency_floor must be within 0-1, got {}",
                self.efficiency_floor
            ));
        }
        if !(0.0..=1.0).contains(&self.hybrid_deficit_weight) {
            return invalid(format!(
                "hybrid_deficit_weight must be within 0-1, got {}",
                self.hybrid_deficit_weight
            ));
        }
        if !(self.level_weight_base.is_finite() && self.level_weight_base > 0.0) {
            return invalid(format!(
                "level_weight_base must be positive, got {}",
                self.level_weight_base
            ));
        }
        if !(self.morale_divisor.is_finite() && self.morale_divisor > 0.0) {
            return invalid(format!(
                "morale_divisor must be positive, got {}",
                self.morale_divisor
            ));
        }
        self.tuning.validate()?;
        self.resolved_room_priorities()?;
        Ok(())
    }
}

/// Equipment allocation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutfitStrategy {
    /// Largest deficit first within ascending class priority.
    #[default]
    DeficitFirst,

    /// Largest footprint-times-level first.
    BigRoomsFirst,

    /// Blend of normalized deficit and station value.
    Hybrid,

    /// Stations whose matching items waste the least bonus first.
    EfficiencyFirst,
}

impl OutfitStrategy {
    pub fn name(self) -> &'static str {
        match self {
            OutfitStrategy::DeficitFirst => "deficit_first",
            OutfitStrategy::BigRoomsFirst => "big_rooms_first",
            OutfitStrategy::Hybrid => "hybrid",
            OutfitStrategy::EfficiencyFirst => "efficiency_first",
        }
    }
}

impl fmt::Display for OutfitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot that improvements are measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceBaseline {
    /// `initial` if the snapshot had productive occupants, else `before_balancing`.
    #[default]
    Auto,

    /// The layout as found in the snapshot.
    Initial,

    /// The greedy plan, before any swaps.
    #[serde(alias = "beforeBalancing")]
    BeforeBalancing,
}

/// Adaptive tuning settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TuningConfig {
    /// Number of recent cycles analyzed.
    pub learning_window: usize,

    /// Relative improvement over the reference considered good enough.
    pub target_improvement: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            learning_window: 10,
            target_improvement: 0.05,
        }
    }
}

impl TuningConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.learning_window == 0 {
            return Err(ConfigError::Invalid(
                "tuning.learning_window must be at least 1".to_string(),
            ));
        }
        if !(self.target_improvement.is_finite() && self.target_improvement >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tuning.target_improvement must be non-negative, got {}",
                self.target_improvement
            )));
        }
        Ok(())
    }
}
