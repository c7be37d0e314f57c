use std::sync::Arc;
use thiserror::Error;

/// Result type alias using DiffError
pub type Result<T> = std::result::Result<T, DiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure of a diff invocation is a configuration problem or a failing
/// custom equality capability. Structural anomalies (null vs present, cycles,
/// count mismatches) are never errors; they become ordinary differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    /// A selector does not resolve to a pure member/projection chain
    InvalidSelector,
    /// A raw dotted path string is malformed
    InvalidPath,
    /// The two roots handed to an untyped entry point have different types or shapes
    RootTypeMismatch,
    /// A member accessor produced a value whose shape contradicts its declared kind
    DescriptorMismatch,
    /// Object nesting went past the configured `max_depth`
    DepthExceeded,

    // Equality capability
    /// A custom equality capability raised an error while being invoked
    EqualityOverrideFailed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSelector => "ERR_INVALID_SELECTOR",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::RootTypeMismatch => "ERR_ROOT_TYPE_MISMATCH",
            ExErrorKind::DescriptorMismatch => "ERR_DESCRIPTOR_MISMATCH",
            ExErrorKind::DepthExceeded => "ERR_DEPTH_EXCEEDED",
            ExErrorKind::EqualityOverrideFailed => "ERR_EQUALITY_OVERRIDE_FAILED",
        }
    }

    /// True for errors caused by how the comparison was configured
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidSelector
                | ExErrorKind::InvalidPath
                | ExErrorKind::RootTypeMismatch
                | ExErrorKind::DescriptorMismatch
                | ExErrorKind::DepthExceeded
        )
    }
}

/// Canonical structured error type
///
/// Returned by every public entry point. Carries a stable kind plus the
/// operation, path and type context needed to locate the failure. A failing
/// custom equality keeps its [`EqualityError`] reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    type_name: Option<String>,
    message: String,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            type_name: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add canonical path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add type name context
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the underlying error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the type name context, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error raised by a [`CustomEquality`](crate::descriptor::CustomEquality) capability
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EqualityError {
    message: String,
}

impl EqualityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error taxonomy for the diff engine internals
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Selector could not be compiled against the root type
    #[error("Invalid selector `{selector}` on {root_type}: {reason}")]
    InvalidSelector {
        root_type: String,
        selector: String,
        reason: String,
    },

    /// Raw path string is malformed
    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Roots of an untyped comparison do not share a type
    #[error("Root types differ: left is {left}, right is {right}")]
    RootTypeMismatch { left: String, right: String },

    /// Accessor returned a value that does not fit the member's declared kind
    #[error("Member {type_name}.{member} is declared {expected} but produced {found}")]
    DescriptorMismatch {
        type_name: String,
        member: String,
        expected: String,
        found: String,
    },

    /// Object nesting went past the configured bound
    #[error("Nesting at {path} exceeds max depth {max_depth}")]
    DepthExceeded { path: String, max_depth: usize },

    /// Custom equality capability failed
    #[error("Custom equality of {type_name} failed at {path}: {source}")]
    EqualityOverride {
        type_name: String,
        path: String,
        #[source]
        source: EqualityError,
    },
}

/// Conversion from DiffError to ExError
impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::InvalidSelector {
                root_type,
                selector,
                reason,
            } => ExError::new(ExErrorKind::InvalidSelector)
                .with_type_name(root_type)
                .with_path(selector)
                .with_message(reason),

            DiffError::InvalidPath { path, reason } => ExError::new(ExErrorKind::InvalidPath)
                .with_path(path)
                .with_message(reason),

            DiffError::RootTypeMismatch { left, right } => {
                ExError::new(ExErrorKind::RootTypeMismatch)
                    .with_type_name(left.clone())
                    .with_message(format!("left root is {}, right root is {}", left, right))
            }

            DiffError::DescriptorMismatch {
                type_name,
                member,
                expected,
                found,
            } => ExError::new(ExErrorKind::DescriptorMismatch)
                .with_type_name(type_name)
                .with_path(format!(".{}", member))
                .with_message(format!("declared {} but produced {}", expected, found)),

            DiffError::DepthExceeded { path, max_depth } => {
                ExError::new(ExErrorKind::DepthExceeded)
                    .with_path(path)
                    .with_message(format!("nesting exceeds max depth {}", max_depth))
            }

            DiffError::EqualityOverride {
                type_name,
                path,
                source,
            } => ExError::new(ExErrorKind::EqualityOverrideFailed)
                .with_type_name(type_name)
                .with_path(path)
                .with_message(source.message().to_string())
                .with_source(source),
        }
    }
}
