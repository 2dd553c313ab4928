use std::{ffi::OsString, path::PathBuf, process::Command};

#[cfg(target_family = "unix")]
use std::os::unix::process::CommandExt;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dotref::{env::SystemEnv, GetEnv, Options};

/// Load a .env file into the environment, then run a command.
///
/// Without a command the resulting variables are printed.
#[derive(Parser)]
#[command(name = "dotref", version)]
struct Cli {
    /// File to load
    #[arg(short, long, env = "DOTREF_CONFIG_PATH", default_value = ".env")]
    file: PathBuf,

    /// Overwrite variables that are already set
    #[arg(short, long = "override")]
    override_env: bool,

    /// Ignore a missing or unreadable file
    #[arg(long)]
    optional: bool,

    /// Command and arguments to run
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<OsString>,
}

fn exec(cli: Cli) -> anyhow::Result<()> {
    let options = Options {
        override_env: cli.override_env,
        required: !cli.optional,
        path: &cli.file,
    };
    options.config()?;

    let mut args = cli.command.into_iter();
    let Some(program) = args.next() else {
        // the file was already applied; parse again only for its key order
        let parsed = std::fs::read(&cli.file)
            .map(|bytes| dotref::parse_bytes(&bytes))
            .unwrap_or_default();

        let env = SystemEnv::new();
        for key in parsed.keys() {
            if let Some(value) = env.get_lossy(key) {
                println!("{key}={value}");
            }
        }
        return Ok(());
    };

    #[cfg(target_family = "unix")]
    return Err(Command::new(&program).args(args).exec())
        .with_context(|| format!("failed to execute {program:?}"));

    #[cfg(not(target_family = "unix"))]
    {
        let status = Command::new(&program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute {program:?}"))?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(error) = exec(Cli::parse()) {
        eprintln!("dotref: {error:#}");
        std::process::exit(1);
    }
}
