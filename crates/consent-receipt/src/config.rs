//! Deriver configuration
//!
//! [`DeriverConfig`] carries the few knobs the derivation reads: the school's
//! operating hours, the receipt format version tag, the suggested export file
//! name and an optional window display pattern. Defaults match the consent
//! flow as deployed; a TOML file can override any subset.

use crate::error::ConsentError;
use serde::{Deserialize, Serialize};

/// Receipt format version tag
pub const RECEIPT_VERSION: &str = "consent-receipt/1.0";

/// Suggested file name for exported receipts
pub const RECEIPT_FILE_NAME: &str = "consent_receipt.txt";

/// School operating hours, half-open `[start_hour, end_hour)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// First hour inside school hours
    pub start_hour: u32,
    /// First hour after school hours
    pub end_hour: u32,
}

impl OperatingHours {
    /// Create hours
    ///
    /// # Errors
    /// Returns error unless `start_hour < end_hour <= 24`
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConsentError> {
        let hours = Self {
            start_hour,
            end_hour,
        };
        hours.validate()?;
        Ok(hours)
    }

    /// Whether `hour` falls inside the interval
    #[inline]
    #[must_use]
    pub const fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    fn validate(&self) -> Result<(), ConsentError> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(ConsentError::Config(format!(
                "operating hours must satisfy start < end <= 24, got {}..{}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 16,
        }
    }
}

/// Derivation and export configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    /// Hours the school is staffed
    pub operating_hours: OperatingHours,
    /// Version tag written into each receipt
    pub receipt_version: String,
    /// Suggested export file name
    pub receipt_file_name: String,
    /// chrono pattern for custom windows; short weekday + time when unset
    pub window_pattern: Option<String>,
}

impl DeriverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With operating hours
    #[inline]
    #[must_use]
    pub fn with_operating_hours(mut self, hours: OperatingHours) -> Self {
        self.operating_hours = hours;
        self
    }

    /// With receipt version tag
    #[inline]
    #[must_use]
    pub fn with_receipt_version(mut self, version: impl Into<String>) -> Self {
        self.receipt_version = version.into();
        self
    }

    /// With export file name
    #[inline]
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.receipt_file_name = name.into();
        self
    }

    /// With window display pattern
    #[inline]
    #[must_use]
    pub fn with_window_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.window_pattern = Some(pattern.into());
        self
    }

    /// Load from TOML text; missing keys take their defaults
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this shape or the
    /// resulting configuration fails [`DeriverConfig::validate`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConsentError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConsentError::Config(e.to_string()))?;
        config.validate()?;
        tracing::debug!(
            "Loaded deriver config: hours {}..{}, version {}",
            config.operating_hours.start_hour,
            config.operating_hours.end_hour,
            config.receipt_version
        );
        Ok(config)
    }

    /// Render as TOML text
    ///
    /// # Errors
    /// Returns error if TOML serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConsentError> {
        toml::to_string(self).map_err(|e| ConsentError::Config(e.to_string()))
    }

    /// Check invariants
    ///
    /// # Errors
    /// Returns error for inverted or out-of-day hours, an empty version tag
    /// or an empty or path-like file name
    pub fn validate(&self) -> Result<(), ConsentError> {
        self.operating_hours.validate()?;
        if self.receipt_version.trim().is_empty() {
            return Err(ConsentError::Config("receipt version must not be empty".into()));
        }
        let name = self.receipt_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ConsentError::Config(format!(
                "receipt file name must be a bare file name, got '{}'",
                self.receipt_file_name
            )));
        }
        Ok(())
    }
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            operating_hours: OperatingHours::default(),
            receipt_version: RECEIPT_VERSION.to_string(),
            receipt_file_name: RECEIPT_FILE_NAME.to_string(),
            window_pattern: None,
        }
    }
}
