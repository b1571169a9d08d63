use clap::Parser;
use log::info;
use server::config::Config;
use server::engine::LeaderboardEngine;
use server::network::Server;
use std::path::PathBuf;
use std::sync::Arc;

/// Main-method of the application.
/// Parses command-line arguments, freezes the configuration, then runs
/// the network server until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "8080")]
        port: u16,
        /// Comma-separated table names to serve
        #[clap(short, long, default_value = "highscores")]
        tables: String,
        /// Maximum number of entries retained per table
        #[clap(short, long, default_value = "100")]
        capacity: usize,
        /// Directory holding the table files
        #[clap(short, long, default_value = ".")]
        data_dir: PathBuf,
        /// Stamp each accepted entry with a submission time
        #[clap(long)]
        record_time: bool,
        /// Require a binding proof on every submission
        #[clap(long)]
        require_proof: bool,
        /// Salt mixed into the binding proof digest
        #[clap(long, default_value = "-UwU-")]
        proof_salt: String,
    }

    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    // Parse command line arguments
    let args = Args::parse();

    if args.capacity == 0 {
        return Err("table capacity must be positive".into());
    }

    let config = Arc::new(Config {
        tables: Config::split_tables(&args.tables),
        capacity: args.capacity,
        data_dir: args.data_dir,
        record_time: args.record_time,
        require_proof: args.require_proof,
        proof_salt: args.proof_salt,
    });

    let engine = Arc::new(LeaderboardEngine::new(Arc::clone(&config)));

    if engine.tables().is_empty() {
        return Err("no valid table names configured".into());
    }

    // Touch every table so missing files exist before traffic arrives
    for table in engine.tables() {
        let entries = engine.list(&table).await?;
        info!("Table '{}' ready with {} entries", table, entries.len());
    }

    let address = format!("{}:{}", args.host, args.port);
    let mut server = Server::new(&address, engine).await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
