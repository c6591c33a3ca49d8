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

//! Database settings mapper for the Sahara service
//!
//! Turns a set of database parameters and host facts into the `database/*`
//! entries of `sahara.conf` and, when the connection scheme needs one, a
//! Python driver package declaration.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod connection;
pub mod driver;
pub mod engine;
pub mod output;
pub mod params;
pub mod plan;

pub use connection::{ConnectionString, Scheme};
pub use driver::PackageDeclaration;
pub use params::{DbParameters, HostFacts, OsFamily, ParamValue};
pub use plan::{ConfigEntry, ConfigValue, DbConfigurator, DbPlan};

/// Marker meaning "leave the option unset and let the service use its built-in default"
pub const SERVICE_DEFAULT: &str = "<SERVICE DEFAULT>";

/// Error in the database settings mapper
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The connection string is rejected before anything is emitted.
    #[error("Invalid connection string with scheme '{scheme}': must match {pattern}")]
    InvalidConnectionString {
        scheme: String,
        pattern: &'static str,
    },

    #[error("Output error: {0}")]
    Output(String),
}
