// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! hdds-mx configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: well-known descriptor field names and value class names
//! - **Level 2 (Dynamic)**: [`RuntimeConfig`] holding the current [`Settings`]
//!
//! Settings are swapped atomically (`ArcSwap`), so readers never lock.
//!
//! # Example
//!
//! ```rust
//! use hdds_mx::config::{RuntimeConfig, Settings};
//!
//! let config = RuntimeConfig::new();
//! config.set_settings(Settings::default().with_qualified_type_names(true));
//! assert!(config.settings().qualified_type_names);
//! ```

use arc_swap::ArcSwap;
use std::sync::Arc;

// =======================================================================
// Descriptor fields
// =======================================================================

/// Open type of the described element. Filled in automatically by info builders.
pub const FIELD_OPEN_TYPE: &str = "openType";
/// Rust type the element was mapped from. Filled in automatically by info builders.
pub const FIELD_ORIGINAL_TYPE: &str = "originalType";
pub const FIELD_SINCE: &str = "since";
pub const FIELD_LOCALE: &str = "locale";
pub const FIELD_UNITS: &str = "units";
pub const FIELD_ENABLED: &str = "enabled";
pub const FIELD_DEPRECATION: &str = "deprecation";
pub const FIELD_METRIC_TYPE: &str = "metricType";
pub const FIELD_SEVERITY: &str = "severity";
pub const FIELD_MIN_VALUE: &str = "minValue";
pub const FIELD_MAX_VALUE: &str = "maxValue";
pub const FIELD_DEFAULT_VALUE: &str = "defaultValue";
pub const FIELD_LEGAL_VALUES: &str = "legalValues";
pub const FIELD_IMMUTABLE_INFO: &str = "immutableInfo";
pub const FIELD_INFO_TIMEOUT: &str = "infoTimeout";
pub const FIELD_DESCRIPTION_RESOURCE_KEY: &str = "descriptionResourceKey";

// =======================================================================
// Value classes exposed in metadata
// =======================================================================

/// Value class reported for composite attributes and parameters.
pub const CLASS_COMPOSITE_DATA: &str = "CompositeData";
/// Value class reported for tabular attributes and parameters.
pub const CLASS_TABULAR_DATA: &str = "TabularData";
/// Class name reported by interfaces built without an explicit one.
pub const DEFAULT_INTERFACE_CLASS: &str = "DynamicInterface";

// =======================================================================
// Environment
// =======================================================================

pub const ENV_QUALIFIED_TYPE_NAMES: &str = "HDDS_MX_QUALIFIED_TYPE_NAMES";
pub const ENV_VALIDATE_VALUES: &str = "HDDS_MX_VALIDATE_VALUES";
pub const ENV_CHECK_RETURN_VALUES: &str = "HDDS_MX_CHECK_RETURN_VALUES";

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Report `originalType` as the full Rust path (`app::model::Address`)
    /// instead of the bare type name (`Address`).
    pub qualified_type_names: bool,
    /// Type-check every value a composite writer extracts.
    pub validate_values: bool,
    /// Type-check operation results against the declared return type.
    pub check_return_values: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            qualified_type_names: false,
            validate_values: true,
            check_return_values: true,
        }
    }
}

impl Settings {
    /// Defaults overridden by `HDDS_MX_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            qualified_type_names: env_flag(ENV_QUALIFIED_TYPE_NAMES)
                .unwrap_or(defaults.qualified_type_names),
            validate_values: env_flag(ENV_VALIDATE_VALUES).unwrap_or(defaults.validate_values),
            check_return_values: env_flag(ENV_CHECK_RETURN_VALUES)
                .unwrap_or(defaults.check_return_values),
        }
    }

    #[must_use]
    pub fn with_qualified_type_names(mut self, enabled: bool) -> Self {
        self.qualified_type_names = enabled;
        self
    }

    #[must_use]
    pub fn with_validate_values(mut self, enabled: bool) -> Self {
        self.validate_values = enabled;
        self
    }

    #[must_use]
    pub fn with_check_return_values(mut self, enabled: bool) -> Self {
        self.check_return_values = enabled;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    parse_flag(&raw).or_else(|| {
        log::warn!("[config] ignoring {}={:?}: expected a boolean", name, raw);
        None
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Runtime configuration owned by each mapper.
///
/// Lock-free: `settings()` is an atomic load, `set_settings()` an atomic swap.
#[derive(Debug)]
pub struct RuntimeConfig {
    settings: ArcSwap<Settings>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeConfig {
    /// Config seeded from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::from_env())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
        }
    }

    /// Current settings snapshot.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> Settings {
        **self.settings.load()
    }

    /// Replace the settings. Objects already built keep what they captured.
    #[inline]
    pub fn set_settings(&self, settings: Settings) {
        self.settings.store(Arc::new(settings));
    }

    /// Back to the environment-derived defaults.
    pub fn reset(&self) {
        self.set_settings(Settings::from_env());
    }
}
