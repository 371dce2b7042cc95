//! Compile-time configuration. None of these values can be changed from the command line or the
//! environment; they are gathered in [`Settings`] so the pipeline can be exercised with other values
//! in tests.

use std::fmt;

pub const UPSTREAM_OWNER: &str = "paulirish";
pub const UPSTREAM_NAME: &str = "pwmetrics";

pub const IMAGE_NAME: &str = "pwmetrics";
pub const BUILD_TOOL: &str = "docker";

/// Name of the `ARG` in the Dockerfile that selects the pwmetrics release to install.
pub const VERSION_BUILD_ARG: &str = "PWMETRICS_VERSION";

pub const BUILD_CONTEXT: &str = ".";

/// Only used in log messages, the registry is implied by the image name.
pub const REGISTRY_LABEL: &str = "hub.docker.com";

/// The moving tag that is rebuilt after all versioned tags.
pub const LATEST: &str = "latest";

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub rejects requests without a user agent.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A GitHub repository identified by its owner and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repository<'a> {
    pub owner: &'a str,
    pub name: &'a str,
}

impl<'a> Repository<'a> {
    pub const fn new(owner: &'a str, name: &'a str) -> Self {
        Self { owner, name }
    }

    /// URL of the "list repository tags" endpoint. GitHub caps `per_page` at 100, this is the most a
    /// single request can return.
    pub fn tags_url(&self, api_url: &str) -> String {
        format!(
            "{api_url}/repos/{owner}/{name}/tags?per_page=100",
            api_url = api_url.trim_end_matches('/'),
            owner = self.owner,
            name = self.name,
        )
    }
}

impl fmt::Display for Repository<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What to do when pushing an image that was built successfully fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PushFailurePolicy {
    /// Stop the run, remaining versions and `latest` are not published.
    #[default]
    Abort,
    /// Log a warning and continue with the next version, like a failed build.
    Continue,
}

#[derive(Debug, Clone)]
pub struct Settings<'a> {
    pub repository: Repository<'a>,
    pub image_name: &'a str,
    pub build_tool: &'a str,
    pub version_build_arg: &'a str,
    pub build_context: &'a str,
    pub registry_label: &'a str,
    pub push_failure: PushFailurePolicy,
}

impl Settings<'static> {
    pub const DEFAULT: Self = Self {
        repository: Repository::new(UPSTREAM_OWNER, UPSTREAM_NAME),
        image_name: IMAGE_NAME,
        build_tool: BUILD_TOOL,
        version_build_arg: VERSION_BUILD_ARG,
        build_context: BUILD_CONTEXT,
        registry_label: REGISTRY_LABEL,
        push_failure: PushFailurePolicy::Abort,
    };
}

impl Default for Settings<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}
