mod commands;
mod data_struct;
mod error;
mod file_store;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

use commands::destroy::Destroyer;
use commands::global::resolve_home_dir;
use file_store::LocalFileStore;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("virtphp={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let matches = Command::new("virtphp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage isolated PHP development environments")
        .arg(
            Arg::new("home")
                .long("home")
                .global(true)
                .help("Directory holding .virtphp/environments.json (defaults to $VIRTPHP_HOME or your home)")
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .help("Show debug output")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("destroy")
                .about("Delete a virtual environment and drop it from the environment list")
                .arg(
                    Arg::new("path")
                        .help("Root directory of the environment")
                        .default_value(".")
                        .index(1),
                ),
        )
        .get_matches();

    init_logging(matches.get_flag("debug"));

    match matches.subcommand() {
        Some(("destroy", sub_matches)) => {
            let home_dir = match resolve_home_dir(matches.get_one::<PathBuf>("home").map(PathBuf::as_path)) {
                Ok(home) => home,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let path = sub_matches.get_one::<String>("path").map(String::as_str);

            let destroyer = Destroyer::new(&LocalFileStore, home_dir, path);
            tracing::debug!(
                "destroying {} (environment list under {})",
                destroyer.root_path(),
                destroyer.home_dir().display()
            );

            match destroyer.execute() {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::FAILURE,
                Err(e) => {
                    eprintln!("Failed to destroy environment: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            println!("No valid command provided. Use one of:");
            println!("  virtphp destroy [PATH]");
            ExitCode::FAILURE
        }
    }
}
