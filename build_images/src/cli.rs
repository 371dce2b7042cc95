use clap::Parser;
use constcat::concat;

use crate::{
    config::{Settings, IMAGE_NAME, UPSTREAM_NAME, UPSTREAM_OWNER},
    event::LogSink,
    github::GitHub,
    process::SystemRunner,
    Result,
};

#[derive(Debug, Parser)]
#[command(
    version,
    about = concat!(
        "Builds and pushes the `", IMAGE_NAME, "` image for every release tag of ",
        UPSTREAM_OWNER, "/", UPSTREAM_NAME, ", then refreshes `", IMAGE_NAME, ":latest`."
    )
)]
pub struct Cli {}

impl Cli {
    pub fn run(self) -> Result<()> {
        let settings = Settings::default();
        let source = GitHub::new()?;

        crate::run(&settings, &source, &SystemRunner, &mut LogSink)?;

        Ok(())
    }
}
