use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `revu` binary.
#[derive(Debug, Parser)]
#[command(name = "revu", version, about = "Revu - company and offering reviews API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the HTTP API until Ctrl-C
    Serve(ServeArgs),

    /// Open the database and apply pending migrations
    Migrate(DatabaseArgs),

    /// Convert between record ids and hashids
    Hashid {
        #[command(subcommand)]
        action: HashidCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Debug, Args)]
pub struct DatabaseArgs {
    /// Override `database.path` (`:memory:` for a throwaway database)
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum HashidCommands {
    /// Encode a record id
    Encode { id: i64 },
    /// Decode a hashid back to its record id
    Decode { hashid: String },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, HashidCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_overrides_parse() {
        let cli = Cli::try_parse_from(["revu", "serve", "--port", "8080", "--database", ":memory:", "-v"])
            .expect("cli should parse");

        assert!(cli.verbose);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.host, None);
        assert_eq!(args.database.database.as_deref(), Some(":memory:"));
    }

    #[test]
    fn hashid_subcommands_parse() {
        let cli = Cli::try_parse_from(["revu", "--quiet", "hashid", "decode", "x7Gk2pQa"]).expect("cli should parse");
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Hashid { action: HashidCommands::Decode { ref hashid } } if hashid == "x7Gk2pQa"
        ));
    }

    #[test]
    fn negative_ids_are_rejected_as_flags() {
        assert!(Cli::try_parse_from(["revu", "hashid", "encode", "-5"]).is_err());
    }
}
