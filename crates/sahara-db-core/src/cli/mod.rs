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

use crate::config::{LogFormat, LoggingConfig, PlanConfig};
use crate::engine::Engine;
use crate::params::OsFamily;
use crate::Error;
use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command};
use std::ffi::OsString;
use tracing::{info, Level};
use tracing_subscriber::fmt;

#[derive(Default)]
pub struct Cli {
    pub config: Option<PlanConfig>,
    pub validate_only: bool,
    /// Help or version was printed; nothing left to run
    pub exit_early: bool,
}

fn command() -> Command {
    Command::new("sahara-db")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Map Sahara database parameters onto sahara.conf options and driver packages.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Specify the profile path.")
                .required(true),
        )
        .arg(
            Arg::new("validate")
                .short('v')
                .long("validate")
                .help("Only validate the parameters, do not write any output.")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("os-family")
                .long("os-family")
                .value_name("FAMILY")
                .help("Override the OS family from the profile (Debian, RedHat, ...)."),
        )
}

impl Cli {
    pub fn parse(&mut self) -> Result<(), Error> {
        self.parse_from(std::env::args_os())
    }

    pub fn parse_from<I, T>(&mut self, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match command().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.print()?;
                self.exit_early = true;
                return Ok(());
            }
            Err(e) => return Err(Error::Config(e.to_string())),
        };
        self.apply(&matches)
    }

    fn apply(&mut self, matches: &ArgMatches) -> Result<(), Error> {
        let config_path = matches
            .get_one::<String>("config")
            .ok_or_else(|| Error::Config("Missing --config".to_string()))?;
        let mut config = PlanConfig::from_file(config_path)?;

        if let Some(family) = matches.get_one::<String>("os-family") {
            config.facts.os_family = OsFamily::from(family.clone());
        }

        self.validate_only = matches.get_flag("validate");
        self.config = Some(config);
        Ok(())
    }

    pub async fn run(&mut self) -> Result<(), Error> {
        if self.exit_early {
            return Ok(());
        }
        let config = self
            .config
            .take()
            .ok_or_else(|| Error::Config("No configuration loaded".to_string()))?;
        init_logging(&config.logging)?;

        let engine = Engine::new(config);
        // If you just verify the configuration, exit it
        if self.validate_only {
            engine.plan()?;
            info!("The config is validated.");
            return Ok(());
        }

        engine.run().await?;
        Ok(())
    }
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), Error> {
    let subscriber_builder = fmt::Subscriber::builder().with_max_level(parse_level(&config.level));

    let set_default = |e: tracing::subscriber::SetGlobalDefaultError| {
        Error::Config(format!("You can't set a global default log subscriber: {}", e))
    };

    // Check if we need to output logs to a file
    if let Some(file_path) = &config.file_path {
        // Create the file and parent directories if they don't exist
        if let Some(parent) = std::path::Path::new(file_path).parent() {
            std::fs::create_dir_all(parent).ok();
        }

        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)
        {
            Ok(file) => {
                let builder = subscriber_builder
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false);
                match config.format {
                    LogFormat::JSON => {
                        tracing::subscriber::set_global_default(builder.json().finish())
                            .map_err(set_default)?;
                    }
                    LogFormat::PLAIN => {
                        tracing::subscriber::set_global_default(builder.finish())
                            .map_err(set_default)?;
                    }
                }

                info!("Logging to file: {}", file_path);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", file_path, e);
                // Fall back to console logging
            }
        }
    }

    match config.format {
        LogFormat::JSON => {
            tracing::subscriber::set_global_default(subscriber_builder.json().finish())
                .map_err(set_default)?;
        }
        LogFormat::PLAIN => {
            tracing::subscriber::set_global_default(subscriber_builder.finish())
                .map_err(set_default)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profile(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_with_family_override() {
        let file = profile("facts:\n  os_family: Debian\n");
        let path = file.path().to_str().unwrap();

        let mut cli = Cli::default();
        cli.parse_from(["sahara-db", "-c", path, "--os-family", "RedHat", "--validate"])
            .unwrap();

        assert!(cli.validate_only);
        assert_eq!(cli.config.unwrap().facts.os_family, OsFamily::RedHat);
    }

    #[test]
    fn test_help_and_version_are_not_errors() {
        for flag in ["--help", "--version"] {
            let mut cli = Cli::default();
            cli.parse_from(["sahara-db", flag]).unwrap();
            assert!(cli.exit_early, "{}", flag);
            assert!(cli.config.is_none());
        }
    }

    #[tokio::test]
    async fn test_run_after_help_does_nothing() {
        let mut cli = Cli::default();
        cli.parse_from(["sahara-db", "-h"]).unwrap();
        cli.run().await.unwrap();
    }

    #[test]
    fn test_config_is_required() {
        let mut cli = Cli::default();
        assert!(cli.parse_from(["sahara-db"]).is_err());
    }

    #[test]
    fn test_bad_profile_is_reported() {
        let file = profile("facts: [");
        let mut cli = Cli::default();
        let err = cli
            .parse_from(["sahara-db", "-c", file.path().to_str().unwrap()])
            .unwrap_err();
        assert!(err.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("loud"), Level::INFO);
    }
}
