//! Tycoon CLI Client
//!
//! Command-line interface for a Tycoon key-value store server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use tycoon::{params, Config, Params, Result, Tycoon};

/// Tycoon CLI
#[derive(Parser, Debug)]
#[command(name = "tycoon-cli")]
#[command(about = "CLI for the Tycoon key-value store")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value = "1978")]
    port: u16,

    /// Connection timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Database identifier (server default when omitted)
    #[arg(long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Expiration from now in seconds (negative = absolute epoch time)
        #[arg(long)]
        xt: Option<i64>,
    },

    /// Add a record (fails if the key exists)
    Add {
        key: String,
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Add a number to an integer record
    Incr {
        key: String,

        /// The additional number
        #[arg(default_value = "1")]
        num: i64,
    },

    /// Show record count and database size
    Status,

    /// Show the server information report
    Report,

    /// Remove all records in the database
    Clear,

    /// Scan and eliminate expired-record regions
    Vacuum,

    /// Echo records back from the server (connectivity check)
    Echo,

    /// List all records via a forward cursor scan
    List,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tycoon=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout(Duration::from_secs(args.timeout))
        .build();

    match run(&config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, args: &Args) -> Result<()> {
    let mut client = Tycoon::open(config)?;

    let mut db_params = Params::new();
    if let Some(db) = &args.db {
        db_params.insert("DB", db.clone());
    }

    match &args.command {
        Commands::Get { key } => {
            let mut p = db_params;
            p.insert("key", key.clone());
            let body = client.get(p)?;
            print_field(body, "value");
        }
        Commands::Set { key, value, xt } => {
            let mut p = db_params;
            p.insert("key", key.clone()).insert("value", value.clone());
            if let Some(xt) = xt {
                p.insert("xt", xt.to_string());
            }
            client.set(p)?;
            println!("OK");
        }
        Commands::Add { key, value } => {
            let mut p = db_params;
            p.insert("key", key.clone()).insert("value", value.clone());
            client.add(p)?;
            println!("OK");
        }
        Commands::Del { key } => {
            let mut p = db_params;
            p.insert("key", key.clone());
            client.remove(p)?;
            println!("OK");
        }
        Commands::Incr { key, num } => {
            let mut p = db_params;
            p.insert("key", key.clone()).insert("num", num.to_string());
            let body = client.increment(p)?;
            print_field(body, "num");
        }
        Commands::Status => {
            print_all(client.status(db_params)?);
        }
        Commands::Report => {
            print_all(client.report()?);
        }
        Commands::Clear => {
            client.clear(db_params)?;
            println!("OK");
        }
        Commands::Vacuum => {
            client.vacuum(db_params)?;
            println!("OK");
        }
        Commands::Echo => {
            let body = client.echo(params! { "ping" => "pong" })?;
            print_all(body);
        }
        Commands::List => {
            list_records(&mut client, args.db.as_deref())?;
        }
    }

    client.close();
    Ok(())
}

/// Forward-scan every record, printing `key\tvalue` lines.
fn list_records(client: &mut Tycoon, db: Option<&str>) -> Result<()> {
    let mut cursor = match db {
        Some(db) => client.cursor_on_db("tycoon-cli", db),
        None => client.cursor("tycoon-cli"),
    };
    if let Err(e) = cursor.jump(None) {
        // An empty database invalidates the cursor on the first jump.
        if e.kind() == Some(tycoon::ErrorKind::InvalidCursor) {
            return Ok(());
        }
        return Err(e);
    }
    loop {
        match cursor.get(true) {
            Ok(record) => println!("{}\t{}", record.key, record.value),
            Err(e) if e.kind() == Some(tycoon::ErrorKind::InvalidCursor) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn print_field(body: Option<Params>, field: &str) {
    if let Some(value) = body.as_ref().and_then(|b| b.get(field)) {
        println!("{}", value);
    }
}

fn print_all(body: Option<Params>) {
    if let Some(body) = body {
        for (k, v) in body.iter() {
            println!("{}\t{}", k, v);
        }
    }
}
