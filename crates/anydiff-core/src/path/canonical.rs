//! Canonical member paths and the include/exclude filter built from them.

use crate::errors::{DiffError, Result};
use crate::policy::ComparisonPolicy;
use serde::{Deserialize, Serialize};

/// Ordered list of member names identifying a location in a type's
/// structure. Collection traversal never contributes a segment, so
/// `.Children.X` names the `X` member of every element of `Children`.
///
/// Rendered as `.A.B.C`; the root renders as `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CanonicalPath {
    segments: Vec<String>,
}

impl CanonicalPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a raw dotted path such as `.Children.X` or `._keys`.
    ///
    /// # Errors
    ///
    /// `InvalidPath` when the text does not start with `.` or contains an
    /// empty segment.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| DiffError::InvalidPath {
            path: text.to_string(),
            reason: reason.to_string(),
        };

        let rest = text
            .strip_prefix('.')
            .ok_or_else(|| invalid("path must start with '.'"))?;
        if rest.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in rest.split('.') {
            if segment.is_empty() {
                return Err(invalid("path contains an empty segment"));
            }
            if segment.chars().any(char::is_whitespace) {
                return Err(invalid("path segments cannot contain whitespace"));
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// This path extended by one member name
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_string());
        Self { segments }
    }

    /// True when `prefix` equals this path or is one of its ancestors
    pub fn starts_with(&self, prefix: &CanonicalPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl std::fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return write!(f, ".");
        }
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl From<CanonicalPath> for String {
    fn from(path: CanonicalPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for CanonicalPath {
    type Error = DiffError;

    fn try_from(text: String) -> Result<Self> {
        Self::parse(&text)
    }
}

impl std::str::FromStr for CanonicalPath {
    type Err = DiffError;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

/// How a member at a given path takes part in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Compare and report differences
    Report,
    /// Descend to reach included members below, but report nothing here
    Traverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Exclude,
    Include,
}

/// Include or exclude list of canonical paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    mode: FilterMode,
    paths: Vec<CanonicalPath>,
}

impl PathFilter {
    pub fn exclude(paths: Vec<CanonicalPath>) -> Self {
        Self {
            mode: FilterMode::Exclude,
            paths,
        }
    }

    pub fn include(paths: Vec<CanonicalPath>) -> Self {
        Self {
            mode: FilterMode::Include,
            paths,
        }
    }

    /// Interpret `paths` as an inclusion list when the policy carries
    /// `INCLUDE_LIST`, as an exclusion list otherwise
    pub fn from_policy(policy: ComparisonPolicy, paths: Vec<CanonicalPath>) -> Self {
        if policy.is_inclusion() {
            Self::include(paths)
        } else {
            Self::exclude(paths)
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn paths(&self) -> &[CanonicalPath] {
        &self.paths
    }

    /// Decide whether the member at `path` is reported, only traversed, or
    /// skipped (`None`).
    pub fn classify(&self, path: &CanonicalPath) -> Option<Scope> {
        match self.mode {
            FilterMode::Exclude => {
                if self.paths.iter().any(|excluded| path.starts_with(excluded)) {
                    None
                } else {
                    Some(Scope::Report)
                }
            }
            FilterMode::Include => {
                if self.paths.iter().any(|included| path.starts_with(included)) {
                    Some(Scope::Report)
                } else if self.paths.iter().any(|included| included.starts_with(path)) {
                    Some(Scope::Traverse)
                } else {
                    None
                }
            }
        }
    }
}
