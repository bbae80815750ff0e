use crate::cli::{AddArgs, Cli, Command};
use anyhow::Context;
use log::info;
use parcel_core::db::open_db;
use parcel_core::{
    init_logging, is_registered, timestamp_now, NewParcel, Parcel, ParcelRepository,
    ParcelService, SqliteParcelRepository,
};
use std::time::Instant;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir)?;
    }

    let started_at = Instant::now();
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn)?);
    let name = cli.command.name();

    match cli.command {
        Command::Add(args) => print_parcel(&cmd_add(&service, args)?)?,
        Command::Get(args) => print_parcel(&service.parcel(args.number)?)?,
        Command::List(args) => {
            let parcels = service.client_parcels(args.client)?;
            println!("{}", serde_json::to_string_pretty(&parcels)?);
        }
        Command::SetStatus(args) => {
            service.set_status(args.number, &args.status)?;
            println!("parcel {} status set to `{}`", args.number, args.status);
        }
        Command::SetAddress(args) => {
            service.change_address(args.number, &args.address)?;
            println!("parcel {} address changed", args.number);
        }
        Command::Delete(args) => {
            service.remove(args.number)?;
            println!("parcel {} deleted", args.number);
        }
    }

    info!(
        "event=cli_command module=cli status=ok command={name} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn cmd_add<R: ParcelRepository>(
    service: &ParcelService<R>,
    args: AddArgs,
) -> anyhow::Result<Parcel> {
    let parcel = match args.created_at {
        None if is_registered(&args.status) => service.register(args.client, args.address)?,
        created_at => service.add(NewParcel {
            client: args.client,
            status: args.status,
            address: args.address,
            created_at: created_at.unwrap_or_else(timestamp_now),
        })?,
    };
    Ok(parcel)
}

fn print_parcel(parcel: &Parcel) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(parcel)?);
    Ok(())
}
