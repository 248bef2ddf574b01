//! PV CLI - Command line tool for checking and inspecting parcel viewer data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pv-cli",
    version,
    about = "Parcel imagery viewer data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: pv_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    pv_cmd::run(cli.command).await
}
