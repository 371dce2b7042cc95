use std::fmt;

use crate::{
    config::{PushFailurePolicy, Settings, LATEST},
    docker,
    event::{Event, EventSink},
    process::{self, Runner},
    target::BuildTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pushed,
    BuildFailed,
    /// Only produced with [`PushFailurePolicy::Continue`].
    PushFailed,
    /// The version can not be used as an image tag, nothing was run.
    Skipped,
}

/// The outcome of every published version, in the order they were processed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<(String, Outcome)>,
}

impl Report {
    pub fn entries(&self) -> &[(String, Outcome)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn pushed(&self) -> usize {
        self.count(Outcome::Pushed)
    }

    pub fn build_failed(&self) -> usize {
        self.count(Outcome::BuildFailed)
    }

    pub fn push_failed(&self) -> usize {
        self.count(Outcome::PushFailed)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skipped)
    }
}

#[derive(Debug)]
pub struct PushError {
    pub reference: String,
    pub source: process::Error,
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pushing {} failed: {}", self.reference, self.source)
    }
}

impl std::error::Error for PushError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Builds and pushes one image per version, strictly one after the other.
pub struct Publisher<'a> {
    settings: &'a Settings<'a>,
    runner: &'a dyn Runner,
    sink: &'a mut dyn EventSink,
}

impl<'a> Publisher<'a> {
    pub fn new(
        settings: &'a Settings<'a>,
        runner: &'a dyn Runner,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            settings,
            runner,
            sink,
        }
    }

    /// Publishes each version in order and then `latest`. A failed build only affects its own
    /// version. A failed push ends the run unless the settings say to continue.
    pub fn publish_all<'v, I>(mut self, versions: I) -> Result<Report, PushError>
    where
        I: IntoIterator<Item = &'v str>,
    {
        let mut report = Report::default();

        for version in versions.into_iter().chain([LATEST]) {
            let outcome = self.publish(version)?;
            report.entries.push((
                format!("{}:{version}", self.settings.image_name),
                outcome,
            ));
        }

        self.sink.emit(Event::Finished { report: &report });
        Ok(report)
    }

    pub fn publish(&mut self, version: &str) -> Result<Outcome, PushError> {
        let Self {
            settings,
            runner,
            ref mut sink,
        } = *self;

        let target = match BuildTarget::new(settings.image_name, version) {
            Ok(target) => target,
            Err(error) => {
                sink.emit(Event::Skipped {
                    version,
                    reason: &error,
                });
                return Ok(Outcome::Skipped);
            }
        };
        let reference = target.reference();

        sink.emit(Event::Building { reference });
        if let Err(error) = docker::build(runner, settings, &target) {
            sink.emit(Event::BuildFailed {
                reference,
                error: &error,
            });
            return Ok(Outcome::BuildFailed);
        }
        sink.emit(Event::Built { reference });

        let registry = settings.registry_label;
        sink.emit(Event::Pushing {
            reference,
            registry,
        });
        match docker::push(runner, settings, &target) {
            Ok(()) => {
                sink.emit(Event::Pushed {
                    reference,
                    registry,
                });
                Ok(Outcome::Pushed)
            }
            Err(error) => match settings.push_failure {
                PushFailurePolicy::Abort => Err(PushError {
                    reference: reference.to_owned(),
                    source: error,
                }),
                PushFailurePolicy::Continue => {
                    sink.emit(Event::PushFailed {
                        reference,
                        error: &error,
                    });
                    Ok(Outcome::PushFailed)
                }
            },
        }
    }
}
