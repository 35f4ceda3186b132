use clap::{Parser, Subcommand};

mod admin_cli;

use admin_cli::advert_commands::{AdvertAction, handle_advert_command};
use admin_cli::user_commands::{UserAction, handle_user_command};
use admin_cli::utils::establish_connection;

#[derive(Parser)]
#[command(name = "hireboard-admin")]
#[command(about = "Operator CLI for the hireboard database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Manage user accounts")]
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    #[command(about = "Inspect job adverts")]
    Advert {
        #[command(subcommand)]
        action: AdvertAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut conn = match establish_connection() {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::User { action } => handle_user_command(&mut conn, action),
        Commands::Advert { action } => handle_advert_command(&mut conn, action),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
