use log::{debug, info, warn};

use crate::{config::Repository, process, publish::Report, version::VersionTag};

/// Progress of a run, reported by the resolver and the publisher as it happens.
#[derive(Debug)]
pub enum Event<'a> {
    /// A tag of the upstream repository that does not name a version.
    Discarded {
        name: &'a str,
    },
    Resolved {
        repository: &'a Repository<'a>,
        versions: &'a [VersionTag],
    },
    Skipped {
        version: &'a str,
        reason: &'a dyn std::error::Error,
    },
    Building {
        reference: &'a str,
    },
    BuildFailed {
        reference: &'a str,
        error: &'a process::Error,
    },
    Built {
        reference: &'a str,
    },
    Pushing {
        reference: &'a str,
        registry: &'a str,
    },
    PushFailed {
        reference: &'a str,
        error: &'a process::Error,
    },
    Pushed {
        reference: &'a str,
        registry: &'a str,
    },
    Finished {
        report: &'a Report,
    },
}

pub trait EventSink {
    fn emit(&mut self, event: Event<'_>);
}

/// Writes events to the `log` facade.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: Event<'_>) {
        match event {
            Event::Discarded { name } => debug!("ignoring tag {name:?}, not a version"),
            Event::Resolved {
                repository,
                versions,
            } => {
                info!(
                    "Found {count} versions of {repository}: {list}",
                    count = versions.len(),
                    list = versions
                        .iter()
                        .map(VersionTag::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            Event::Skipped { version, reason } => {
                warn!("Skipping version {version:?}: {reason}");
            }
            Event::Building { reference } => info!("Building {reference}..."),
            Event::BuildFailed { reference, error } => {
                warn!("Building {reference} failed, continuing to the next published version: {error}");
            }
            Event::Built { reference } => info!("Successfully built {reference}!"),
            Event::Pushing {
                reference,
                registry,
            } => info!("Pushing {reference} to {registry}..."),
            Event::PushFailed { reference, error } => {
                warn!("Pushing {reference} failed, continuing to the next published version: {error}");
            }
            Event::Pushed {
                reference,
                registry,
            } => info!("Successfully pushed {reference} to {registry}!"),
            Event::Finished { report } => {
                info!(
                    "Published {pushed} of {total} images ({build_failed} failed to build, {push_failed} failed to push, {skipped} skipped)",
                    pushed = report.pushed(),
                    total = report.len(),
                    build_failed = report.build_failed(),
                    push_failed = report.push_failed(),
                    skipped = report.skipped(),
                );
            }
        }
    }
}
