use clap::Parser;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use client::Connection;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:13337")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Connecting to {}", args.server);
    let connection = Connection::connect(&args.server).await?;
    info!("Connected");

    let (mut reader, mut writer) = connection.into_split();

    // Inbound blocks print as they arrive; the operator's think-time never
    // blocks the connection.
    tokio::spawn(async move {
        loop {
            match reader.recv_block().await {
                Ok(block) => {
                    if !block.is_empty() {
                        println!("{block}");
                    }
                }
                Err(e) => {
                    error!("Connection lost: {}", e);
                    std::process::exit(1);
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        writer.send_command(line).await?;
    }

    Ok(())
}
