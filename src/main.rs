//! conan-conf command line tool
//!
//! Inspect and edit `conan.conf` and print the effective client settings.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::{debug, error, info};

use conan_conf::common::{init_logger, ConfError, LocalFs, Result, Storage};
use conan_conf::config::{config_path, default_client_conf, ClientConfig, ConfigPath, ProcessEnv, Settings};
use conan_conf::{APP_NAME, VERSION};

/// Inspect and edit the conan client configuration
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Configuration file (default: $CONAN_USER_HOME/.conan/conan.conf)
    #[clap(long, env = "CONAN_CONF_FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Log level of this tool (error, warn, info, debug, trace).
    /// Defaults to the configured logging level.
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a value (section.key), a section listing (section) or the whole file
    Get {
        item: Option<String>,
    },

    /// Store a value, e.g. `set general.parallel_download=4`
    Set {
        item: String,
    },

    /// Remove a key (section.key) or a whole section
    Rm {
        item: String,
    },

    /// Print the effective environment variables of every known setting
    Env {
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print every typed setting
    Show {
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        // No-op when the logger is already set up
        init_logger("error");
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let path = match args.config_file.clone() {
        Some(path) => path,
        None => config_path(&ProcessEnv)?,
    };

    if let Command::Init { force } = args.command {
        init_logger(args.log_level.as_deref().unwrap_or("info"));
        return init(&path, force);
    }

    let loaded = ClientConfig::load(&path);
    let level = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging_level().to_level_filter().to_string().to_lowercase(),
        (None, Err(_)) => "error".to_string(),
    };
    init_logger(&level);
    debug!("{} v{} using {}", APP_NAME, VERSION, path.display());

    let mut config = loaded?;

    match args.command {
        Command::Get { item: None } => print!("{}", config.file().dump()),
        Command::Get { item: Some(item) } => {
            let value = config.file().get(&ConfigPath::parse(&item)?)?;
            println!("{}", value);
        }
        Command::Set { item } => {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| ConfError::Usage(format!("expected section.key=value, got '{}'", item)))?;
            let key = ConfigPath::parse(key.trim())?;
            config.file_mut().set(&key, value.trim())?;
            info!("{} set in {}", key, path.display());
        }
        Command::Rm { item } => {
            let item = ConfigPath::parse(&item)?;
            config.file_mut().remove(&item)?;
            info!("{} removed from {}", item, path.display());
        }
        Command::Env { json } => {
            let vars = config.env_vars();
            if json {
                println!("{}", serde_json::to_string_pretty(&vars)?);
            } else {
                for (name, value) in &vars {
                    println!("{}={}", name, value);
                }
            }
        }
        Command::Show { json } => {
            let settings = config.settings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        Command::Init { force } => init(&path, force)?,
    }

    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfError::Usage(format!(
            "{} already exists, use --force to overwrite it",
            path.display()
        )));
    }

    LocalFs.save(path, &default_client_conf())?;
    info!("Default configuration written to {}", path.display());
    Ok(())
}

fn print_settings(settings: &Settings) {
    fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
        value.map_or_else(|| "-".to_string(), |value| value.to_string())
    }

    println!("logging_level: {}", settings.logging_level);
    println!("logging_file: {}", optional(settings.logging_file.as_ref().map(|p| p.display())));
    println!("log_run_to_output: {}", settings.log_run_to_output);
    println!("generate_run_log_file: {}", settings.generate_run_log_file);
    println!("print_commands_to_output: {}", settings.print_commands_to_output);
    println!("non_interactive: {}", settings.non_interactive);
    println!("parallel_download: {}", optional(settings.parallel_download));
    println!(
        "config_install_interval: {}",
        optional(settings.config_install_interval.map(|interval| format!("{}s", interval.as_secs())))
    );
    println!("hooks: {}", settings.hooks.join(","));
    println!("cacert_path: {}", optional(settings.cacert_path.as_ref().map(|p| p.display())));
    println!("required_version: {}", optional(settings.required_version.as_deref()));

    match &settings.proxies {
        None => println!("proxies: system"),
        Some(proxies) => {
            println!("proxies:");
            for (key, proxy) in proxies.iter() {
                println!("  {} = {}", key, proxy.unwrap_or("None"));
            }
        }
    }
}
