//! CLI command implementations
//!
//! Each command loads the configuration, applies its log level, loads the
//! schema registry and prints a single JSON response.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::schema::SchemaRegistry;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of `*.json` module descriptors (required)
    pub schema_dir: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::Config("schema_dir must not be empty".into()));
        }
        self.threshold()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn threshold(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::Config(format!("Invalid log_level: {}", e)))
    }

    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { config } => write_response(check(&config)?),
        Command::Paths { config, module } => write_response(paths(&config, &module)?),
    }
}

/// Loads configuration and every descriptor it points at.
fn open_registry(config_path: &Path) -> CliResult<SchemaRegistry> {
    let config = Config::load(config_path)?;
    Logger::set_threshold(config.threshold()?);

    let config_display = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", config_display.as_str()),
            ("schema_dir", config.schema_dir.as_str()),
        ],
    );

    let mut registry = SchemaRegistry::new(config.schema_path());
    registry.load_all()?;
    Ok(registry)
}

/// Compiles every descriptor and summarizes the registered modules.
pub fn check(config_path: &Path) -> CliResult<Value> {
    let registry = open_registry(config_path)?;

    let modules: Vec<Value> = registry
        .modules()
        .map(|schema| {
            json!({
                "module": schema.module(),
                "revision": schema.revision(),
                "prefix": schema.prefix(),
                "nodes": schema.node_count(),
            })
        })
        .collect();

    Ok(json!({ "modules": modules }))
}

/// Schema path outline of one module.
pub fn paths(config_path: &Path, module: &str) -> CliResult<Value> {
    let registry = open_registry(config_path)?;
    let schema = registry.require(module)?;

    Ok(json!({
        "module": schema.module(),
        "root": schema.root_segment(),
        "paths": schema.schema_paths(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn entity_state_descriptor() -> Value {
        json!({
            "module": "Cisco-IOS-XR-sysadmin-entity-state-mib",
            "prefix": "ENTITY-STATE-MIB",
            "revision": "2017-04-12",
            "root": {
                "name": "ENTITY-STATE-MIB",
                "containers": [{
                    "name": "entStateTable",
                    "lists": [{
                        "name": "entStateEntry",
                        "keys": ["entPhysicalIndex"],
                        "leaves": [
                            { "name": "entPhysicalIndex", "type": "int32", "range": "1..2147483647" },
                            { "name": "entStateAdmin", "type": "enumeration",
                              "enums": [
                                  { "name": "notSupported", "value": 1 },
                                  { "name": "locked", "value": 2 }
                              ] }
                        ]
                    }]
                }]
            }
        })
    }

    fn create_config(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("yangtree.json");
        let schema_dir = temp_dir.path().join("schemas");
        fs::create_dir_all(&schema_dir).unwrap();

        fs::write(
            schema_dir.join("entity-state.json"),
            entity_state_descriptor().to_string(),
        )
        .unwrap();

        let config = json!({
            "schema_dir": schema_dir.to_string_lossy(),
            "log_level": "warn"
        });
        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_check_lists_modules() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let data = check(&config_path).unwrap();
        let modules = data["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0]["module"], "Cisco-IOS-XR-sysadmin-entity-state-mib");
        assert_eq!(modules[0]["revision"], "2017-04-12");
        assert_eq!(modules[0]["nodes"], 3);
    }

    #[test]
    fn test_paths_outline() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let data = paths(&config_path, "Cisco-IOS-XR-sysadmin-entity-state-mib").unwrap();
        let outline: Vec<&str> = data["paths"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();
        assert!(outline.contains(
            &"Cisco-IOS-XR-sysadmin-entity-state-mib:ENTITY-STATE-MIB/entStateTable/entStateEntry[entPhysicalIndex]"
        ));
    }

    #[test]
    fn test_paths_unknown_module() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let err = paths(&config_path, "IF-MIB").unwrap_err();
        assert_eq!(err.code(), "YT_UNKNOWN_MODULE");
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("yangtree.json");
        fs::write(&config_path, json!({ "schema_dir": "/srv/schemas" }).to_string()).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.threshold().unwrap(), Severity::Info);
    }

    #[test]
    fn test_config_rejects_bad_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("yangtree.json");
        let config = json!({ "schema_dir": "/srv/schemas", "log_level": "verbose" });
        fs::write(&config_path, config.to_string()).unwrap();

        let err = Config::load(&config_path).unwrap_err();
        assert_eq!(err.code(), "YT_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_rejects_empty_schema_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("yangtree.json");
        fs::write(&config_path, json!({ "schema_dir": "" }).to_string()).unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_missing_schema_dir_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("yangtree.json");
        let missing = temp_dir.path().join("absent");
        let config = json!({ "schema_dir": missing.to_string_lossy(), "log_level": "fatal" });
        fs::write(&config_path, config.to_string()).unwrap();

        let err = check(&config_path).unwrap_err();
        assert_eq!(err.code(), "YT_SCHEMA_MALFORMED");
    }
}
