use crate::{
    config::Settings,
    process::{self, Runner},
    target::BuildTarget,
};

/// `docker build --pull --no-cache --build-arg <ARG>=<version> -t <image>:<version> <context>`
///
/// Base layers are always pulled and the build cache is never used, so every run installs the
/// requested release from scratch.
pub fn build_command(settings: &Settings, target: &BuildTarget) -> process::Command {
    process::command!(
        settings.build_tool,
        "build",
        "--pull",
        "--no-cache",
        "--build-arg",
        format!(
            "{arg}={version}",
            arg = settings.version_build_arg,
            version = target.version()
        ),
        "-t",
        target.reference(),
        settings.build_context,
    )
}

/// `docker push <image>:<version>`
pub fn push_command(settings: &Settings, target: &BuildTarget) -> process::Command {
    process::command!(settings.build_tool, "push", target.reference())
}

pub fn build(
    runner: &dyn Runner,
    settings: &Settings,
    target: &BuildTarget,
) -> process::Result<()> {
    runner.run(build_command(settings, target))
}

pub fn push(
    runner: &dyn Runner,
    settings: &Settings,
    target: &BuildTarget,
) -> process::Result<()> {
    runner.run(push_command(settings, target))
}
