// ABOUTME: POSIX path on a remote host.
// ABOUTME: Kept as a string so local platform path rules never leak into remote paths.

use std::fmt;

/// An absolute path on the remote host, always `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            Self("/".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Append one or more `/`-separated segments.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        if self.0 == "/" {
            Self(format!("/{segment}"))
        } else {
            Self(format!("{}/{segment}", self.0))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_inserts_single_separator() {
        let home = RemotePath::new("/home/ubuntu/testapp/");
        assert_eq!(home.join("www").as_str(), "/home/ubuntu/testapp/www");
        assert_eq!(home.join("/www/").join("log").as_str(), "/home/ubuntu/testapp/www/log");
    }

    #[test]
    fn join_from_root() {
        assert_eq!(RemotePath::new("/").join("etc").as_str(), "/etc");
        assert_eq!(RemotePath::new("").as_str(), "/");
    }

    #[test]
    fn join_empty_segment_is_identity() {
        let root = RemotePath::new("/srv");
        assert_eq!(root.join(""), root);
    }
}
