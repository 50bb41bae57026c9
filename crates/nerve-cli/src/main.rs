mod args;
mod cmd;

use args::{BotArgs, StoreArgs};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nerve",
    about = "Mr. Nerve: a truth-or-dare chat bot with an optional roast mode",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP bridge a chat gateway posts messages to
    Serve {
        /// Shared bearer token the gateway must present
        #[arg(long, env = "NERVE_BOT_TOKEN", hide_env_values = true)]
        token: String,

        /// Port to listen on (0 = OS-assigned)
        #[arg(long, env = "NERVE_PORT", default_value = "3141")]
        port: u16,

        #[command(flatten)]
        bot: BotArgs,
    },

    /// Chat with the bot on stdin/stdout (`name: text` sets the author)
    Console {
        #[command(flatten)]
        bot: BotArgs,
    },

    /// Create the truths and dares tables if they are missing
    Schema {
        #[command(flatten)]
        store: StoreArgs,
    },
}

fn main() {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Console { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve { token, port, bot } => cmd::serve::run(&bot, &token, port),
        Commands::Console { bot } => cmd::console::run(&bot),
        Commands::Schema { store } => cmd::schema::run(&store),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
