use clap::Parser;
use log::info;
use std::time::Duration;

use server::game::{Deathmatch, Game};
use server::maps;
use server::net::Server;
use server::player::rifle_factory;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Per-session readiness wait in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Kills needed to win the match
    #[arg(long, default_value_t = 25)]
    max_kills: u32,
}

/// All game state lives on this one task; the runtime stays single-threaded.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let game = Game::new(
        maps::beige(),
        Box::new(Deathmatch::new(args.max_kills)),
        rifle_factory,
    );

    let address = format!("{}:{}", args.host, args.port);
    let mut server = Server::bind(&address, game, Duration::from_millis(args.poll_ms)).await?;

    info!("Starting text shooter server on {}", address);
    server.run().await
}
