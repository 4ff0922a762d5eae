use clap::Subcommand;
use quorum_core::storage::AppConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "suggestions.default_limit", "display.timezone")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

fn get(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "suggestions.default_limit" => Some(config.suggestions.default_limit.to_string()),
        "suggestions.min_availability_pct" => {
            Some(config.suggestions.min_availability_pct.to_string())
        }
        "suggestions.prune_stale" => Some(config.suggestions.prune_stale.to_string()),
        "display.timezone" => Some(config.display.timezone.clone()),
        _ => None,
    }
}

fn set(config: &mut AppConfig, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    match key {
        "suggestions.default_limit" => config.suggestions.default_limit = value.parse()?,
        "suggestions.min_availability_pct" => {
            config.suggestions.min_availability_pct = value.parse()?
        }
        "suggestions.prune_stale" => config.suggestions.prune_stale = value.parse()?,
        "display.timezone" => {
            value
                .parse::<chrono_tz::Tz>()
                .map_err(|_| format!("unknown timezone: {value}"))?;
            config.display.timezone = value.to_string();
        }
        _ => return Err(format!("unknown key: {key}").into()),
    }
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = AppConfig::load_or_default();
            match get(&config, &key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load_or_default();
            set(&mut config, &key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = AppConfig::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            AppConfig::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
