//! Schema registry: loads module descriptors and hands out compiled schemas
//!
//! - Descriptors are stored as `<schema_dir>/<module>@<revision>.json`
//! - One registered revision per module; registrations are immutable
//! - A missing or malformed descriptor fails the whole load (FATAL)
//!
//! The registry is an explicit value owned by the application. Trees are
//! built from it with [`SchemaRegistry::instantiate`]; nothing is looked up
//! through process-wide state.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::tree::DataTree;

use super::errors::{SchemaError, SchemaResult};
use super::model::Schema;
use super::types::ModuleDef;

/// Registry of compiled module schemas, keyed by module name.
pub struct SchemaRegistry {
    /// Directory containing descriptor files
    schema_dir: PathBuf,
    /// Compiled schemas, ordered by module name
    modules: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry backed by the given descriptor directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            modules: BTreeMap::new(),
        }
    }

    /// Returns the descriptor directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` descriptor in the schema directory.
    ///
    /// Files are read in name order so failures are reproducible. The first
    /// unreadable, malformed, invalid or duplicate descriptor aborts the load.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let dir = self.schema_dir.display().to_string();
        let scope = ObservationScope::with_fields("SCHEMA_LOAD", &[("dir", dir.as_str())]);

        match self.load_dir() {
            Ok(count) => {
                let modules = count.to_string();
                scope.complete_with_fields(&[("modules", modules.as_str())]);
                Ok(count)
            }
            Err(e) => {
                scope.fail(e.message());
                Err(e)
            }
        }
    }

    /// Compiles every descriptor before registering any of them, so a
    /// failed load leaves the registry as it was.
    fn load_dir(&mut self) -> SchemaResult<usize> {
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut staged = BTreeMap::new();
        for path in &paths {
            let def = read_descriptor(path)?;
            let schema = self.compile_new(&def, &staged)?;
            staged.insert(def.module, schema);
        }

        let count = staged.len();
        for (module, schema) in staged {
            log_registered(&schema);
            self.modules.insert(module, schema);
        }
        Ok(count)
    }

    /// Compiles and registers a descriptor.
    pub fn register(&mut self, def: &ModuleDef) -> SchemaResult<Arc<Schema>> {
        let schema = self.compile_new(def, &BTreeMap::new())?;
        log_registered(&schema);
        self.modules.insert(def.module.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Compiles a descriptor whose module is neither registered nor staged.
    fn compile_new(
        &self,
        def: &ModuleDef,
        staged: &BTreeMap<String, Arc<Schema>>,
    ) -> SchemaResult<Arc<Schema>> {
        let existing = self
            .modules
            .get(&def.module)
            .or_else(|| staged.get(&def.module));
        if let Some(existing) = existing {
            log_event_with_fields(
                Event::SchemaRejected,
                &[("module", def.module.as_str()), ("reason", "immutable")],
            );
            return Err(SchemaError::immutable(&def.module, existing.revision()));
        }

        Schema::compile(def).map(Arc::new).map_err(|e| {
            log_event_with_fields(
                Event::SchemaRejected,
                &[("module", def.module.as_str()), ("reason", e.message())],
            );
            e
        })
    }

    /// Gets a compiled schema by module name.
    pub fn get(&self, module: &str) -> Option<&Arc<Schema>> {
        self.modules.get(module)
    }

    /// Gets a compiled schema or fails with `YT_UNKNOWN_MODULE`.
    pub fn require(&self, module: &str) -> SchemaResult<&Arc<Schema>> {
        self.get(module)
            .ok_or_else(|| SchemaError::unknown_module(module))
    }

    /// Checks if a module is registered.
    pub fn exists(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Returns all registered schemas in module name order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.modules.values()
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Builds a fresh data tree rooted at the module's top-level container.
    pub fn instantiate(&self, module: &str) -> SchemaResult<DataTree> {
        let schema = self.require(module)?;
        Ok(DataTree::new(Arc::clone(schema)))
    }

    /// Writes a descriptor to the schema directory.
    ///
    /// An existing file for the same module and revision is never replaced.
    pub fn save(&self, def: &ModuleDef) -> SchemaResult<PathBuf> {
        Schema::compile(def)?;

        let path = self
            .schema_dir
            .join(format!("{}@{}.json", def.module, def.revision));

        if path.exists() {
            return Err(SchemaError::immutable(&def.module, &def.revision));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(def).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to serialize: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}

fn read_descriptor(path: &Path) -> SchemaResult<ModuleDef> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
    })
}

fn log_registered(schema: &Schema) {
    let nodes = schema.node_count().to_string();
    log_event_with_fields(
        Event::SchemaRegistered,
        &[
            ("module", schema.module()),
            ("nodes", nodes.as_str()),
            ("revision", schema.revision()),
        ],
    );
}
