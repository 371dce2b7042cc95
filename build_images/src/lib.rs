pub(crate) mod docker;
pub(crate) mod target;

pub mod cli;
pub mod config;
pub mod event;
pub mod github;
pub mod process;
pub mod publish;
pub mod tags;
pub mod version;

use config::Settings;
use event::{Event, EventSink};
use github::TagSource;
use process::Runner;
use publish::{Publisher, Report};
use version::VersionTag;

pub type Result<T, E = Box<dyn std::error::Error + Send + Sync + 'static>> =
    std::result::Result<T, E>;

/// Resolves the versions of the upstream repository and publishes an image for each of them,
/// followed by `latest`.
pub fn run(
    settings: &Settings,
    source: &dyn TagSource,
    runner: &dyn Runner,
    sink: &mut dyn EventSink,
) -> Result<Report> {
    let versions = tags::resolve_tags(source, &settings.repository, sink)?;
    sink.emit(Event::Resolved {
        repository: &settings.repository,
        versions: &versions,
    });

    let report =
        Publisher::new(settings, runner, sink).publish_all(versions.iter().map(VersionTag::as_str))?;

    Ok(report)
}
