use clap::{Args, Parser, Subcommand};
use parcel_core::{default_log_level, ClientId, ParcelNumber, STATUS_REGISTERED};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parcel", about = "Parcel record store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database file; created on first use.
    #[arg(long, global = true, env = "PARCEL_DB", default_value = "parcel.db")]
    pub db: PathBuf,

    #[arg(long, global = true, env = "PARCEL_LOG_LEVEL", default_value = default_log_level())]
    pub log_level: String,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true, env = "PARCEL_LOG_DIR")]
    pub log_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new parcel
    Add(AddArgs),
    /// Show one parcel
    Get(NumberArgs),
    /// List parcels of a client
    List(ListArgs),
    /// Overwrite the status of a parcel
    SetStatus(SetStatusArgs),
    /// Change the address of a registered parcel
    SetAddress(SetAddressArgs),
    /// Delete a registered parcel
    Delete(NumberArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Get(_) => "get",
            Self::List(_) => "list",
            Self::SetStatus(_) => "set-status",
            Self::SetAddress(_) => "set-address",
            Self::Delete(_) => "delete",
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub client: ClientId,
    #[arg(long)]
    pub address: String,
    #[arg(long, default_value = STATUS_REGISTERED)]
    pub status: String,
    /// Defaults to the current UTC time (RFC 3339).
    #[arg(long)]
    pub created_at: Option<String>,
}

#[derive(Args, Debug)]
pub struct NumberArgs {
    pub number: ParcelNumber,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub client: ClientId,
}

#[derive(Args, Debug)]
pub struct SetStatusArgs {
    pub number: ParcelNumber,
    pub status: String,
}

#[derive(Args, Debug)]
pub struct SetAddressArgs {
    pub number: ParcelNumber,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_defaults_to_registered_status() {
        let cli = Cli::try_parse_from(["parcel", "add", "--client", "1", "--address", "A"]).unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.client, 1);
                assert_eq!(args.status, "registered");
                assert!(args.created_at.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_db_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["parcel", "set-status", "42", "sent", "--db", "/tmp/p.db"])
            .unwrap();
        assert_eq!(cli.db.to_str(), Some("/tmp/p.db"));
        assert_eq!(cli.command.name(), "set-status");
    }
}
