use log::debug;

use crate::{
    config::Repository,
    event::{Event, EventSink},
    github::{FetchError, TagSource},
    version::{self, VersionTag},
};

/// Fetches the tags of `repository` with a single request and keeps those that name a semantic
/// version, normalized, in the order the source returned them. Every other tag is reported to `sink`
/// as discarded.
pub fn resolve_tags(
    source: &dyn TagSource,
    repository: &Repository,
    sink: &mut dyn EventSink,
) -> Result<Vec<VersionTag>, FetchError> {
    let records = source.list_tags(repository)?;
    debug!("{repository} has {count} tags", count = records.len());

    Ok(records
        .into_iter()
        .filter_map(|record| {
            let version = version::clean(&record.name);
            if version.is_none() {
                sink.emit(Event::Discarded { name: &record.name });
            }
            version
        })
        .collect())
}
