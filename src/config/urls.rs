//! Version-control host URLs

/// GitHub clone base URL
pub const GITHUB: &str = "https://github.com";

/// GitLab clone base URL
pub const GITLAB: &str = "https://gitlab.com";

/// Bitbucket clone base URL
pub const BITBUCKET: &str = "https://bitbucket.org";
