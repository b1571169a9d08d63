use clap::{Parser, Subcommand};
use client::network::Client;
use log::info;
use shared::{binding_proof, ScoreEntry};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tables the server is configured with
    Tables,
    /// Fetch the current leaderboard for a table
    Get { table: String },
    /// Submit a score and print the resulting leaderboard
    Submit {
        table: String,
        name: String,
        score: i64,
        /// Salt for the binding proof, when the server requires one
        #[arg(long)]
        salt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let client = Client::new(&args.server).await?;

    match args.command {
        Command::Tables => {
            for table in client.list_tables().await? {
                println!("{}", table);
            }
        }

        Command::Get { table } => {
            let entries = client.fetch_leaderboard(&table).await?;
            print_leaderboard(&table, &entries);
        }

        Command::Submit {
            table,
            name,
            score,
            salt,
        } => {
            let proof = salt.map(|salt| binding_proof(&name, score, &salt));
            let entries = client.submit_score(&table, &name, score, proof).await?;

            let retained = entries.iter().any(|e| e.name == name && e.score == score);
            if !retained {
                println!("Score {} did not make the leaderboard", score);
            }
            print_leaderboard(&table, &entries);
        }
    }

    Ok(())
}

fn print_leaderboard(table: &str, entries: &[ScoreEntry]) {
    println!("Leaderboard '{}' ({} entries):", table, entries.len());

    for (rank, entry) in entries.iter().enumerate() {
        match entry.time {
            Some(time) => println!(
                "{:>4}. {:<24} {:>12}  (at {})",
                rank + 1,
                entry.name,
                entry.score,
                time
            ),
            None => println!("{:>4}. {:<24} {:>12}", rank + 1, entry.name, entry.score),
        }
    }
}
