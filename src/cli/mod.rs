pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hydro")]
#[command(about = "Hydro CLI - manage the hydroponics API server and its database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to listen on (defaults to HYDRO_API_PORT/PORT or 3000)")]
        port: Option<u16>,
    },

    #[command(about = "Apply the database schema")]
    Init,

    #[command(about = "Seed the database with test data")]
    Seed,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Init => commands::init::handle().await,
        Commands::Seed => commands::seed::handle().await,
    }
}
