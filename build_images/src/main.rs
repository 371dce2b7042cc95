use clap::Parser;
use log::error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = build_images::cli::Cli::parse().run() {
        error!("{error}");
        std::process::exit(1);
    }
}
