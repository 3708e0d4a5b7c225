//! mysh - a small interactive Unix shell
//!
//! Parses the command line, sets up logging and runs the read-eval loop.

use std::env;
use std::path::PathBuf;
use std::process;

use tracing::{debug, error, info};

use mysh::error::Result;
use mysh::{Shell, ShellOptions};

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Startup file to read instead of `.myshrc`
    rc_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--rc" | "-r" => {
                    if i + 1 < args.len() {
                        app_args.rc_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    } else {
                        return Err("Missing startup file path".into());
                    }
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} v{}", mysh::NAME, mysh::VERSION);
                    process::exit(0);
                }
                arg => {
                    return Err(format!("Unknown option: {}", arg).into());
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("mysh - {}", mysh::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    mysh [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -r, --rc <PATH>    Startup file to read instead of .myshrc");
    println!("    -d, --debug        Enable debug logging");
    println!("    -h, --help         Print this help message");
    println!("    -v, --version      Print version information");
    println!();
    println!("STARTUP FILE:");
    println!("    A JSON object of variables, read from the first of:");
    println!("    1. Path specified with --rc");
    println!("    2. $MYSHDOTDIR/.myshrc");
    println!("    3. ~/.myshrc");
    println!();
    println!("ENVIRONMENT:");
    println!("    MYSHDOTDIR    Directory holding .myshrc");
    println!("    MYSH_DEBUG    Enable debug logging (1 or true)");
    println!("    MYSH_LOG      Logging filter when RUST_LOG is unset");
    println!("    RUST_LOG      Set logging level (error, warn, info, debug, trace)");
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins, then `MYSH_LOG`; otherwise the interpreter stays quiet
/// unless debugging was requested.
fn init_logging(args: &AppArgs) {
    let debug_requested = args.debug
        || env::var("MYSH_DEBUG").map_or(false, |v| v == "1" || v.to_lowercase() == "true");
    let log_level = if debug_requested { "debug" } else { "warn" };

    let env_filter = env::var("RUST_LOG")
        .or_else(|_| env::var("MYSH_LOG"))
        .unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("{}: {}", mysh::SHELL_NAME, e);
        print_help();
        process::exit(2);
    });

    init_logging(&args);
    info!("Starting {} v{}", mysh::NAME, mysh::VERSION);
    debug!("Arguments: {:?}", args);

    let options = ShellOptions {
        rc_path: args.rc_path,
    };

    let code = match Shell::new(options).and_then(|mut shell| shell.run()) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}: {}", mysh::SHELL_NAME, e);
            1
        }
    };
    process::exit(code);
}
