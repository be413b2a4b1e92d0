//! Run configuration loaded from an optional TOML file.
//!
//! ```toml
//! batch_size = 50
//! service_matching = "lenient"
//!
//! [policy]
//! hospital_emergency = "reject"
//! hospital_service_breadth = "off"
//!
//! [analysis]
//! similarity_threshold = 0.9
//! name_prefix_len = 5
//! ```
//!
//! CLI flags override file values.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use intake_analyze::AnalyzerConfig;
use intake_validate::{PolicyLevel, RuleOptions, SchemaOptions, ServiceMatching};

/// Default number of providers per submission batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub batch_size: usize,
    pub service_matching: ServiceMatching,
    pub policy: PolicyConfig,
    pub analysis: AnalyzerConfig,
}

/// Severities of the organizational policy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub hospital_emergency: PolicyLevel,
    pub hospital_service_breadth: PolicyLevel,
    pub hospital_min_services: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            service_matching: ServiceMatching::default(),
            policy: PolicyConfig::default(),
            analysis: AnalyzerConfig::default(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let rules = RuleOptions::new(NaiveDate::MIN);
        Self {
            hospital_emergency: rules.hospital_emergency,
            hospital_service_breadth: rules.hospital_service_breadth,
            hospital_min_services: rules.hospital_min_services,
        }
    }
}

impl IntakeConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        self.analysis.validate()?;
        Ok(())
    }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions::new().with_service_matching(self.service_matching)
    }

    pub fn rule_options(&self, as_of: NaiveDate) -> RuleOptions {
        RuleOptions::new(as_of)
            .with_hospital_emergency(self.policy.hospital_emergency)
            .with_hospital_service_breadth(self.policy.hospital_service_breadth)
            .with_hospital_min_services(self.policy.hospital_min_services)
    }
}
