use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Substitute a plaintext with a key
    Encrypt(cmd::codec::CodecArgs),
    /// Invert a substitution with a known key
    Decrypt(cmd::codec::CodecArgs),
    /// Print a random key for an alphabet
    Keygen(cmd::codec::KeygenArgs),
    /// List the built-in alphabets
    Alphabets,
    /// Count a reference n-gram tensor from a corpus and save it as CSV
    Reference(cmd::reference::ReferenceArgs),
    /// Score a text against a reference tensor
    Score(cmd::reference::ScoreArgs),
    /// Recover the key of a ciphertext by stochastic search
    Crack(cmd::crack::CrackArgs),
}

fn main() {
    // Raw matches let `crack` tell explicit flags from defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Encrypt(args) => cmd::codec::encrypt(args),
        Commands::Decrypt(args) => cmd::codec::decrypt(args),
        Commands::Keygen(args) => cmd::codec::keygen(args),
        Commands::Alphabets => {
            cmd::codec::list_alphabets();
            Ok(())
        }
        Commands::Reference(args) => cmd::reference::build(args),
        Commands::Score(args) => cmd::reference::score(args),
        Commands::Crack(args) => cmd::crack::run(args, matches.subcommand_matches("crack")),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
