use std::fmt;

use semver::{BuildMetadata, Version};

/// Longer inputs are rejected before parsing.
const MAX_LENGTH: usize = 256;

/// A normalized semantic version, e.g. `1.2.3` or `2.0.0-rc1`, as produced by [`clean`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a raw git tag name into a normalized semantic version, or returns `None` if the tag does
/// not name a version.
///
/// Surrounding whitespace and leading `=` and `v` characters are stripped. A version core with a
/// missing minor or patch component is completed with zeros (`v0.9` becomes `0.9.0`). Build
/// metadata is dropped from the result.
pub fn clean(raw: &str) -> Option<VersionTag> {
    let trimmed = raw.trim();
    if trimmed.len() > MAX_LENGTH {
        return None;
    }
    let stripped = trimmed.trim_start_matches(['=', 'v']);

    let version = Version::parse(stripped)
        .ok()
        .or_else(|| Version::parse(&complete_core(stripped)?).ok())?;

    Some(VersionTag(
        Version {
            build: BuildMetadata::EMPTY,
            ..version
        }
        .to_string(),
    ))
}

/// Pads a one or two component version core with `.0` so it can be parsed, keeping any pre-release
/// or build suffix as is.
fn complete_core(value: &str) -> Option<String> {
    let core_end = value.find(['-', '+']).unwrap_or(value.len());
    let (core, suffix) = value.split_at(core_end);

    let components = core.split('.').collect::<Vec<_>>();
    if !components
        .iter()
        .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let padding = match components.len() {
        1 => ".0.0",
        2 => ".0",
        _ => return None,
    };

    Some(format!("{core}{padding}{suffix}"))
}
