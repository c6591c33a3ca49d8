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

//! Output component module
//!
//! An output renders a finished [`DbPlan`] somewhere: a configuration file,
//! a report, the terminal. Output types are registered by name and built
//! from the `outputs` section of the configuration.

use crate::plan::DbPlan;
use crate::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static::lazy_static! {
    static ref OUTPUT_BUILDERS: RwLock<HashMap<String, Arc<dyn OutputBuilder>>> = RwLock::new(HashMap::new());
}

#[async_trait]
pub trait Output: Send + Sync {
    /// Render the plan
    async fn write(&self, plan: &DbPlan) -> Result<(), Error>;
}

pub trait OutputBuilder: Send + Sync {
    fn build(
        &self,
        name: Option<&String>,
        config: &Option<serde_json::Value>,
    ) -> Result<Arc<dyn Output>, Error>;
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "type")]
    pub output_type: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub config: Option<serde_json::Value>,
}

impl OutputConfig {
    /// Building output components
    pub fn build(&self) -> Result<Arc<dyn Output>, Error> {
        let builders = OUTPUT_BUILDERS
            .read()
            .map_err(|e| Error::Output(format!("Output registry poisoned: {}", e)))?;

        if let Some(builder) = builders.get(&self.output_type) {
            builder.build(self.name.as_ref(), &self.config)
        } else {
            Err(Error::Config(format!(
                "Unknown output type: {}",
                self.output_type
            )))
        }
    }
}

pub fn register_output_builder(
    type_name: &str,
    builder: Arc<dyn OutputBuilder>,
) -> Result<(), Error> {
    let mut builders = OUTPUT_BUILDERS
        .write()
        .map_err(|e| Error::Output(format!("Output registry poisoned: {}", e)))?;
    if builders.contains_key(type_name) {
        return Err(Error::Config(format!(
            "Output type already registered: {}",
            type_name
        )));
    }
    builders.insert(type_name.to_string(), builder);
    Ok(())
}

/// Decode the output-specific options of an [`OutputConfig`]
pub fn parse_output_config<T: serde::de::DeserializeOwned>(
    output_type: &str,
    config: &Option<serde_json::Value>,
) -> Result<T, Error> {
    let value = config
        .clone()
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    serde_json::from_value(value).map_err(|e| {
        Error::Config(format!(
            "Invalid {} output configuration: {}",
            output_type, e
        ))
    })
}
