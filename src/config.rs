//! View Configuration
//!
//! Settings shared by a codec registry and the schemas built from it.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::errors::{ViewError, ViewResult};

/// What to do when an attribute or accessor name is declared twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail the schema build
    Forbid,
    /// Log a warning; the last declaration wins
    Warn,
}

/// typedmap configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Duplicate declaration handling (default: forbid)
    #[serde(default = "default_duplicate_policy")]
    pub duplicate_policy: DuplicatePolicy,

    /// Raw key holding the merge provenance list (default: "_merged_from")
    #[serde(default = "default_provenance_key")]
    pub provenance_key: String,

    /// Offset applied to naive timestamps, in seconds east of UTC.
    /// `None` uses the process's local offset.
    #[serde(default)]
    pub naive_utc_offset_secs: Option<i32>,

    /// Currency code for money attributes (default: "USD")
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Decimal places money amounts are rounded to (default: 2)
    #[serde(default = "default_money_scale")]
    pub money_scale: u32,
}

fn default_duplicate_policy() -> DuplicatePolicy {
    DuplicatePolicy::Forbid
}

fn default_provenance_key() -> String {
    "_merged_from".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_money_scale() -> u32 {
    2
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: default_duplicate_policy(),
            provenance_key: default_provenance_key(),
            naive_utc_offset_secs: None,
            default_currency: default_currency(),
            money_scale: default_money_scale(),
        }
    }
}

impl ViewConfig {
    /// Parses a config from JSON; missing fields take their defaults
    pub fn from_json_str(input: &str) -> ViewResult<Self> {
        let config: ViewConfig =
            serde_json::from_str(input).map_err(|e| ViewError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a config with a fixed offset for naive timestamps
    pub fn with_naive_offset(secs: i32) -> Self {
        Self {
            naive_utc_offset_secs: Some(secs),
            ..Default::default()
        }
    }

    /// Checks value ranges
    pub fn validate(&self) -> ViewResult<()> {
        if self.provenance_key.is_empty() {
            return Err(ViewError::InvalidConfig(
                "provenance_key must not be empty".into(),
            ));
        }
        if self.default_currency.trim().is_empty() {
            return Err(ViewError::InvalidConfig(
                "default_currency must not be empty".into(),
            ));
        }
        // rust_decimal supports at most 28 fractional digits
        if self.money_scale > 28 {
            return Err(ViewError::InvalidConfig(format!(
                "money_scale {} exceeds 28",
                self.money_scale
            )));
        }
        self.naive_offset()?;
        Ok(())
    }

    /// Returns the configured naive-timestamp offset, if any
    pub fn naive_offset(&self) -> ViewResult<Option<FixedOffset>> {
        match self.naive_utc_offset_secs {
            None => Ok(None),
            Some(secs) => FixedOffset::east_opt(secs).map(Some).ok_or_else(|| {
                ViewError::InvalidConfig(format!("naive_utc_offset_secs {} out of range", secs))
            }),
        }
    }
}
