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

use crate::config::PlanConfig;
use crate::output::Output;
use crate::plan::{DbConfigurator, DbPlan};
use crate::Error;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs one plan request: map the parameters, then hand the plan to every output
pub struct Engine {
    config: PlanConfig,
    configurator: DbConfigurator,
}

impl Engine {
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            configurator: DbConfigurator::new(),
        }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Map the configured parameters without rendering anything
    pub fn plan(&self) -> Result<DbPlan, Error> {
        self.configurator
            .plan(&self.config.database, &self.config.facts)
    }

    /// Plan and write to all outputs
    ///
    /// All outputs are built before the first write, so an unknown output
    /// type fails the run without touching any target.
    pub async fn run(&self) -> Result<DbPlan, Error> {
        let plan = self.plan()?;
        for entry in plan.entries() {
            info!("{}", entry);
        }
        match plan.package() {
            Some(pkg) => info!(
                "Package {} ({}) should be {}",
                pkg.title, pkg.name, pkg.ensure
            ),
            None => info!(
                "No driver package needed on {}",
                self.config.facts.os_family
            ),
        }

        let outputs = self
            .config
            .outputs
            .iter()
            .map(|c| c.build())
            .collect::<Result<Vec<Arc<dyn Output>>, Error>>()?;
        if outputs.is_empty() {
            warn!("No outputs configured, the plan is only logged");
        }

        for output in &outputs {
            output.write(&plan).await?;
        }
        Ok(plan)
    }
}
