/*
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! Parameter-to-configuration mapping
//!
//! [`DbConfigurator::plan`] validates the connection string first and only
//! then emits entries, so a rejected connection never yields a partial plan.

use crate::connection::ConnectionString;
use crate::driver::{driver_package, PackageDeclaration};
use crate::params::{DbParameters, HostFacts, DEFAULT_CONNECTION, PARAMETER_NAMES};
use crate::{Error, SERVICE_DEFAULT};
use secrecy::ExposeSecret;
use serde_json::json;
use std::fmt;
use tracing::debug;

/// Replacement shown wherever a secret value would be displayed
pub const MASKED_VALUE: &str = "<SECRET>";

const SECTION: &str = "database";

/// Value of one emitted option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Leave the option to the service's built-in default
    ServiceDefault,
    Value(String),
}

impl ConfigValue {
    pub fn is_service_default(&self) -> bool {
        matches!(self, ConfigValue::ServiceDefault)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConfigValue::ServiceDefault => SERVICE_DEFAULT,
            ConfigValue::Value(v) => v,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `section/option` emission
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    key: String,
    value: ConfigValue,
    secret: bool,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: ConfigValue, secret: bool) -> Self {
        Self {
            key: key.into(),
            value,
            secret,
        }
    }

    /// Key path such as `database/connection`
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Section part of the key, `database`
    pub fn section(&self) -> &str {
        self.key.split_once('/').map_or(self.key.as_str(), |(s, _)| s)
    }

    /// Option part of the key, e.g. `max_pool_size`
    pub fn option(&self) -> &str {
        self.key.split_once('/').map_or(self.key.as_str(), |(_, o)| o)
    }

    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// The value as it may appear in logs and reports
    pub fn display_value(&self) -> &str {
        if self.secret {
            MASKED_VALUE
        } else {
            self.value.as_str()
        }
    }
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("key", &self.key)
            .field("value", &self.display_value())
            .field("secret", &self.secret)
            .finish()
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.display_value())
    }
}

/// Result of mapping parameters: configuration entries and an optional driver package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPlan {
    entries: Vec<ConfigEntry>,
    package: Option<PackageDeclaration>,
}

impl DbPlan {
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Entry by key path, e.g. `database/max_pool_size`
    pub fn entry(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn package(&self) -> Option<&PackageDeclaration> {
        self.package.as_ref()
    }

    /// JSON report of the plan with secret values masked
    pub fn to_report(&self) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|e| {
                json!({
                    "key": e.key(),
                    "value": e.display_value(),
                    "secret": e.is_secret(),
                })
            })
            .collect();
        json!({
            "entries": entries,
            "package": self.package,
        })
    }
}

/// Maps [`DbParameters`] onto the `database` section
#[derive(Debug, Clone, Default)]
pub struct DbConfigurator;

impl DbConfigurator {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, params: &DbParameters, facts: &HostFacts) -> Result<DbPlan, Error> {
        let raw = params
            .connection
            .as_ref()
            .map(|c| c.expose_secret().as_str())
            .unwrap_or(DEFAULT_CONNECTION);
        let connection = ConnectionString::parse(raw)?;

        let entries = PARAMETER_NAMES
            .iter()
            .map(|name| {
                let key = format!("{}/{}", SECTION, name);
                if *name == "connection" {
                    let value = ConfigValue::Value(connection.expose().to_string());
                    return ConfigEntry::new(key, value, true);
                }
                let value = match params.value_of(name) {
                    Some(v) => ConfigValue::Value(v.to_string()),
                    None => ConfigValue::ServiceDefault,
                };
                ConfigEntry::new(key, value, false)
            })
            .collect();

        let package = driver_package(
            connection.scheme(),
            &facts.os_family,
            params.package_ensure(),
        );
        debug!(
            "Planned {} database options for scheme {} on {} (driver package: {:?})",
            PARAMETER_NAMES.len(),
            connection.scheme(),
            facts.os_family,
            package.as_ref().map(|p| p.name.as_str())
        );

        Ok(DbPlan { entries, package })
    }
}
