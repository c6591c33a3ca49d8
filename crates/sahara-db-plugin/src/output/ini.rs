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

//! INI output component
//!
//! Write the plan as `sahara.conf` sections. Options left to the service
//! default are written commented out so the file shows every option the
//! plan covers.

use async_trait::async_trait;
use sahara_db_core::output::{parse_output_config, register_output_builder, Output, OutputBuilder};
use sahara_db_core::{DbPlan, Error, SERVICE_DEFAULT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// INI output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IniOutputConfig {
    /// Target file, e.g. `/etc/sahara/sahara.conf`
    pub path: String,
}

pub struct IniOutput {
    name: Option<String>,
    config: IniOutputConfig,
}

impl IniOutput {
    pub fn new(name: Option<String>, config: IniOutputConfig) -> Result<Self, Error> {
        if config.path.is_empty() {
            return Err(Error::Config("ini output requires a path".to_string()));
        }
        Ok(Self { name, config })
    }
}

/// Render the plan's entries grouped by section, in emission order
pub fn render(plan: &DbPlan) -> String {
    let mut sections: Vec<&str> = Vec::new();
    for entry in plan.entries() {
        if !sections.contains(&entry.section()) {
            sections.push(entry.section());
        }
    }

    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", section));
        for entry in plan.entries().iter().filter(|e| e.section() == *section) {
            if entry.value().is_service_default() {
                out.push_str(&format!("#{} = {}\n", entry.option(), SERVICE_DEFAULT));
            } else {
                out.push_str(&format!("{} = {}\n", entry.option(), entry.value()));
            }
        }
    }
    out
}

#[async_trait]
impl Output for IniOutput {
    async fn write(&self, plan: &DbPlan) -> Result<(), Error> {
        let path = Path::new(&self.config.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, render(plan)).await?;
        info!(
            "{} wrote {} options to {}",
            self.name.as_deref().unwrap_or("ini"),
            plan.entries().len(),
            self.config.path
        );
        Ok(())
    }
}

pub(crate) struct IniOutputBuilder;

impl OutputBuilder for IniOutputBuilder {
    fn build(
        &self,
        name: Option<&String>,
        config: &Option<serde_json::Value>,
    ) -> Result<Arc<dyn Output>, Error> {
        let config: IniOutputConfig = parse_output_config("ini", config)?;
        Ok(Arc::new(IniOutput::new(name.cloned(), config)?))
    }
}

pub fn init() -> Result<(), Error> {
    register_output_builder("ini", Arc::new(IniOutputBuilder))
}
