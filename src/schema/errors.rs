//! Schema error types
//!
//! Error codes:
//! - YT_UNKNOWN_MODULE (REJECT)
//! - YT_SCHEMA_INVALID (REJECT)
//! - YT_SCHEMA_IMMUTABLE (REJECT)
//! - YT_SCHEMA_MALFORMED (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected
    Reject,
    /// Schema set cannot be loaded; the host must not continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Module not registered
    YtUnknownModule,
    /// Descriptor violates a structural rule
    YtSchemaInvalid,
    /// Attempt to replace a registered module
    YtSchemaImmutable,
    /// Descriptor file unreadable or not valid JSON
    YtSchemaMalformed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::YtUnknownModule => "YT_UNKNOWN_MODULE",
            SchemaErrorCode::YtSchemaInvalid => "YT_SCHEMA_INVALID",
            SchemaErrorCode::YtSchemaImmutable => "YT_SCHEMA_IMMUTABLE",
            SchemaErrorCode::YtSchemaMalformed => "YT_SCHEMA_MALFORMED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::YtSchemaMalformed => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where a descriptor went wrong and why
#[derive(Debug, Clone)]
pub struct DefinitionDetails {
    /// Schema location (e.g. "ENTITY-STATE-MIB/entStateTable/entStateEntry.entPhysicalIndex")
    pub location: String,
    /// Expected shape or condition
    pub expected: String,
    /// What the descriptor actually contains
    pub actual: String,
}

impl DefinitionDetails {
    pub fn new(
        location: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn undeclared_key(location: impl Into<String>, key: &str) -> Self {
        Self::new(
            location,
            "key naming a declared leaf",
            format!("undeclared key '{}'", key),
        )
    }

    pub fn duplicate_name(location: impl Into<String>, name: &str) -> Self {
        Self::new(
            location,
            "unique child names",
            format!("'{}' declared twice", name),
        )
    }
}

impl fmt::Display for DefinitionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at '{}': expected {}, got {}",
            self.location, self.expected, self.actual
        )
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    module: Option<String>,
    details: Option<DefinitionDetails>,
}

impl SchemaError {
    /// Create an unknown module error
    pub fn unknown_module(module: impl Into<String>) -> Self {
        let module = module.into();
        Self {
            code: SchemaErrorCode::YtUnknownModule,
            message: format!("Module '{}' is not registered", module),
            module: Some(module),
            details: None,
        }
    }

    /// Create an invalid descriptor error
    pub fn invalid(module: impl Into<String>, details: DefinitionDetails) -> Self {
        let module = module.into();
        Self {
            code: SchemaErrorCode::YtSchemaInvalid,
            message: format!("Module '{}' is invalid {}", module, details),
            module: Some(module),
            details: Some(details),
        }
    }

    /// Create a schema immutable error
    pub fn immutable(module: impl Into<String>, revision: impl Into<String>) -> Self {
        let module = module.into();
        Self {
            code: SchemaErrorCode::YtSchemaImmutable,
            message: format!(
                "Module '{}' is already registered (revision '{}')",
                module,
                revision.into()
            ),
            module: Some(module),
            details: None,
        }
    }

    /// Create an error for an unreadable or malformed descriptor file
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::YtSchemaMalformed,
            message: format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            module: None,
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the module name if applicable
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Returns descriptor details if applicable
    pub fn details(&self) -> Option<&DefinitionDetails> {
        self.details.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
