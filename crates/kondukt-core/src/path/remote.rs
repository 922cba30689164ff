//! Normalized remote paths.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `/`-separated path on a remote file system.
///
/// Paths are normalized on construction: repeated separators collapse,
/// single-dot segments are dropped, and trailing separators are stripped
/// (the root `/` stays `/`). Normalization never resolves `..` — remote
/// servers differ on symlink handling, so parent segments are preserved
/// as-is.
///
/// # Examples
///
/// ```
/// use kondukt_core::RemotePath;
///
/// let path = RemotePath::new("/data//incoming/./2024/");
/// assert_eq!(path.as_str(), "/data/incoming/2024");
/// assert_eq!(path.file_name(), Some("2024"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemotePath(String);

impl RemotePath {
    /// Creates a normalized remote path.
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        let raw = path.as_ref();
        let absolute = raw.starts_with('/');

        let segments: Vec<&str> = raw
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();

        let mut normalized = if absolute {
            format!("/{}", segments.join("/"))
        } else {
            segments.join("/")
        };

        if normalized.is_empty() {
            normalized.push('.');
        }

        Self(normalized)
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the path starts with `/`.
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }

    /// Returns `true` if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Appends a relative path, normalizing the result.
    ///
    /// Joining an absolute path replaces `self` entirely, matching
    /// `std::path::Path::join` semantics.
    pub fn join<S: AsRef<str>>(&self, other: S) -> Self {
        let other = other.as_ref();
        if other.starts_with('/') {
            return Self::new(other);
        }
        Self::new(format!("{}/{}", self.0, other))
    }

    /// Returns the final path segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() || self.0 == "." {
            return None;
        }
        self.0.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Returns the parent path, or `None` for the root and bare names.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() || self.0 == "." {
            return None;
        }

        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Returns `true` if `base` is this path or one of its ancestors.
    pub fn starts_with(&self, base: &RemotePath) -> bool {
        if base.is_root() {
            return self.is_absolute();
        }
        self.0 == base.0 || self.0.starts_with(&format!("{}/", base.0))
    }

    /// Strips `base` from this path, returning the relative remainder.
    ///
    /// Returns `None` when `base` is not an ancestor of this path.
    pub fn relative_to(&self, base: &RemotePath) -> Option<Self> {
        if !self.starts_with(base) {
            return None;
        }
        if self.0 == base.0 {
            return Some(Self::new("."));
        }

        let prefix_len = if base.is_root() { 1 } else { base.0.len() + 1 };
        Some(Self::new(&self.0[prefix_len..]))
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RemotePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RemotePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RemotePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl Serialize for RemotePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RemotePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}
