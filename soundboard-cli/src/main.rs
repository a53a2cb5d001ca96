use clap::Parser;

fn main() -> anyhow::Result<()> {
    soundboard_cli::init_logging();
    soundboard_cli::run(soundboard_cli::Args::parse())
}
