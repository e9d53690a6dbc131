//! Contains structures and functionality for the binary
use std::path::PathBuf;

use luadump::io::{source::ConnectionSettings, OutputManager};

/// Default output file.
const DEFAULT_OUTPUT_FILE: &str = "fishing_db.lua";

/// Cli Arguments related to logging
#[derive(clap::Args, Debug)]
pub(crate) struct LoggingArgs {
    /// Increase log verbosity (multiple uses increase verbosity further)
    #[arg(short, long, action = clap::builder::ArgAction::Count, group = "verbosity")]
    verbose: u8,
    /// Reduce log verbosity to show only errors (equivalent to --log error)
    #[arg(short, long, group = "verbosity")]
    quiet: bool,
    /// Set log verbosity (default is "warn")
    #[arg(long = "log", value_parser=clap::builder::PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"]), group = "verbosity")]
    log_level: Option<String>,
}

impl LoggingArgs {
    /// Initialising Logging
    ///
    /// Sets the logging verbosity to the given log-level in the following order:
    ///  * `Info`, `Debug`, `Trace`; depending on the count of `-v`
    ///  * `Error` when `-q` is used
    ///  * The `LUADUMP_LOG` environment variable value
    ///  * `Warn` otherwise
    pub(crate) fn initialize_logging(&self) {
        let mut builder = env_logger::Builder::new();

        // Default log level
        builder.filter_level(log::LevelFilter::Warn);

        builder.parse_env("LUADUMP_LOG");
        if let Some(ref level) = self.log_level {
            builder.parse_filters(level);
        } else if self.quiet {
            builder.filter_level(log::LevelFilter::Error);
        } else if self.verbose > 0 {
            builder.filter_level(match self.verbose {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                3 => log::LevelFilter::Trace,
                _ => log::LevelFilter::Warn,
            });
        }
        builder.init();
    }
}

/// Cli arguments related to the database connection
#[derive(Debug, clap::Args)]
pub(crate) struct ConnectionArgs {
    /// Host name or address of the database server
    #[arg(long, env = "LUADUMP_DB_HOST", default_value = "127.0.0.1")]
    host: String,
    /// Port of the database server
    #[arg(long, env = "LUADUMP_DB_PORT", default_value_t = 3306)]
    port: u16,
    /// Database user
    #[arg(short, long, env = "LUADUMP_DB_USER", default_value = "user")]
    user: String,
    /// Password of the database user
    #[arg(
        short,
        long,
        env = "LUADUMP_DB_PASSWORD",
        default_value = "pass",
        hide_env_values = true
    )]
    password: String,
    /// Name of the database holding the tables
    #[arg(short, long, env = "LUADUMP_DB_NAME", default_value = "dspdb")]
    database: String,
}

impl ConnectionArgs {
    /// Return the settings for connecting to the database.
    pub(crate) fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

/// Cli arguments related to file output
#[derive(Debug, clap::Args)]
pub(crate) struct OutputArgs {
    /// File the Lua tables are written to
    #[arg(short, long = "output", default_value = DEFAULT_OUTPUT_FILE)]
    output_file: PathBuf,
    /// Replace an existing output file
    #[arg(short = 'w', long = "overwrite", default_value = "false")]
    overwrite: bool,
}

impl OutputArgs {
    /// Creates an output manager with the current options
    pub(crate) fn output_manager(&self) -> OutputManager {
        OutputManager::new(self.output_file.clone()).overwrite(self.overwrite)
    }
}

/// Export the fishing tables of a MySQL/MariaDB database as Lua tables
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
pub struct CliApp {
    /// Arguments related to the database connection
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Arguments related to output
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    /// Arguments related to logging
    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}
