use std::{fmt, sync::LazyLock};

use regex::Regex;

/// Tag grammar of the distribution `reference` package: `[\w][\w.-]{0,127}`.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").unwrap());

pub fn is_valid_image_tag(tag: &str) -> bool {
    TAG_REGEX.is_match(tag)
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidImageTag(String);

impl std::error::Error for InvalidImageTag {}

impl fmt::Display for InvalidImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a valid image tag", self.0)
    }
}

/// One image to build and push: a version and the image reference derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget<'a> {
    version: &'a str,
    reference: String,
}

impl<'a> BuildTarget<'a> {
    pub fn new(image_name: &str, version: &'a str) -> Result<Self, InvalidImageTag> {
        if !is_valid_image_tag(version) {
            return Err(InvalidImageTag(version.to_owned()));
        }
        Ok(Self {
            version,
            reference: format!("{image_name}:{version}"),
        })
    }

    pub fn version(&self) -> &'a str {
        self.version
    }

    /// `<image-name>:<version>`
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for BuildTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}
