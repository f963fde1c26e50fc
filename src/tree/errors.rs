//! Data tree error types
//!
//! Error codes:
//! - YT_VALIDATION_FAILED: a key or precondition required by the operation is unset
//! - YT_TYPE_MISMATCH: assigned value's kind disagrees with the leaf type
//! - YT_RANGE_VIOLATION: value outside the declared range, length or value set
//! - YT_PATTERN_MISMATCH: string value does not match the declared pattern
//! - YT_NOT_FOUND: unknown leaf, container or list, or a stale node handle
//!
//! All tree errors reject the single call that raised them. Nothing is
//! transient, so nothing is retried.

use std::fmt;

use super::ids::NodeId;

/// Tree error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeErrorCode {
    YtValidationFailed,
    YtTypeMismatch,
    YtRangeViolation,
    YtPatternMismatch,
    YtNotFound,
}

impl TreeErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            TreeErrorCode::YtValidationFailed => "YT_VALIDATION_FAILED",
            TreeErrorCode::YtTypeMismatch => "YT_TYPE_MISMATCH",
            TreeErrorCode::YtRangeViolation => "YT_RANGE_VIOLATION",
            TreeErrorCode::YtPatternMismatch => "YT_PATTERN_MISMATCH",
            TreeErrorCode::YtNotFound => "YT_NOT_FOUND",
        }
    }
}

impl fmt::Display for TreeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Tree error with the node and leaf it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeError {
    code: TreeErrorCode,
    message: String,
    node: Option<String>,
    leaf: Option<String>,
}

impl TreeError {
    fn new(
        code: TreeErrorCode,
        message: String,
        node: Option<&str>,
        leaf: Option<&str>,
    ) -> Self {
        Self {
            code,
            message,
            node: node.map(str::to_string),
            leaf: leaf.map(str::to_string),
        }
    }

    /// A structural precondition does not hold
    pub fn validation(node: &str, message: impl Into<String>) -> Self {
        Self::new(TreeErrorCode::YtValidationFailed, message.into(), Some(node), None)
    }

    /// A key leaf needed to address an entry is unset
    pub fn missing_key(node: &str, key: &str) -> Self {
        Self::new(
            TreeErrorCode::YtValidationFailed,
            format!("Key leaf '{}' of '{}' is unset", key, node),
            Some(node),
            Some(key),
        )
    }

    pub fn type_mismatch(node: &str, leaf: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            TreeErrorCode::YtTypeMismatch,
            format!("Leaf '{}' expects {}, got {}", leaf, expected, actual),
            Some(node),
            Some(leaf),
        )
    }

    pub fn range_violation(node: &str, leaf: &str, reason: impl Into<String>) -> Self {
        Self::new(
            TreeErrorCode::YtRangeViolation,
            format!("Leaf '{}': {}", leaf, reason.into()),
            Some(node),
            Some(leaf),
        )
    }

    pub fn pattern_mismatch(node: &str, leaf: &str, value: &str, pattern: &str) -> Self {
        Self::new(
            TreeErrorCode::YtPatternMismatch,
            format!("Leaf '{}': '{}' does not match pattern '{}'", leaf, value, pattern),
            Some(node),
            Some(leaf),
        )
    }

    pub fn unknown_leaf(node: &str, leaf: &str) -> Self {
        Self::new(
            TreeErrorCode::YtNotFound,
            format!("'{}' has no leaf '{}'", node, leaf),
            Some(node),
            Some(leaf),
        )
    }

    /// No container or list of that name
    pub fn unknown_child(node: &str, name: &str) -> Self {
        Self::new(
            TreeErrorCode::YtNotFound,
            format!("'{}' has no child '{}'", node, name),
            Some(node),
            None,
        )
    }

    /// The handle refers to a removed node
    pub fn stale_handle(id: NodeId) -> Self {
        Self::new(
            TreeErrorCode::YtNotFound,
            format!("Node {} does not exist in this tree", id),
            None,
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> TreeErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Schema name of the node the error concerns
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Leaf the error concerns
    pub fn leaf(&self) -> Option<&str> {
        self.leaf.as_deref()
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for TreeError {}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
