//! EPI CLI - Command line tool for exploring daily epidemic case data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "epi-cli",
    version,
    about = "Epidemic case dashboard engine"
)]
struct Cli {
    #[command(flatten)]
    data: epi_cmd::DataArgs,

    #[command(subcommand)]
    command: epi_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[EPI] cli: data file {}", cli.data.data.display());
    epi_cmd::run(&cli.data, cli.command)
}
