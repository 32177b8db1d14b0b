use crate::errors::CliError;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::Colorize;
use gmext_config::Config;
use gmext_logger as logger;
use std::fs;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print every configured value
    Show,
    /// Set a value (keys: default-target, publisher)
    Set { key: String, value: String },
    /// Get or set the path to the config file.
    /// If `new_path` is provided, later runs read the config from that path.
    /// If omitted, the CLI prints the current configuration file path.
    Path {
        /// Optional new config path to set
        new_path: Option<String>,
    },
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<(), CliError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, value.clone())?;
            config.save()?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path { new_path } => {
            let config_path = Config::path();
            logger::debug(&format!("Reading config from: {}", config_path.display()));

            match new_path {
                Some(p) => {
                    let Some(pointer_path) = Config::pointer_path() else {
                        return Err(CliError::Usage(
                            "Could not determine the config directory".to_string(),
                        ));
                    };
                    if let Some(parent) = pointer_path.parent() {
                        fs::create_dir_all(parent).map_err(CliError::io(parent))?;
                    }
                    fs::write(&pointer_path, p.as_bytes()).map_err(CliError::io(&pointer_path))?;
                    logger::success(&format!("Config path set to {}", p));
                }
                None => {
                    println!("{}", config_path.display());
                    if config_path != Config::default_path() {
                        println!("{} {}", "default".cyan(), Config::default_path().display());
                    }
                }
            }
        }
    }
    Ok(())
}
