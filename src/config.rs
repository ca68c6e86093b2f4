use std::path::PathBuf;

use clap::Parser;

use crate::{error::{Error, Result}, logic::schedule::series::Series};

/// Multi-division league simulator
#[derive(Parser, Debug, Clone)]
#[command(name = "league-sim", version, about)]
pub struct Config {
    /// League setup file (JSON)
    #[arg(long, env = "LEAGUE_SETUP", default_value = "data/league.json")]
    pub setup: PathBuf,

    /// SQLite database URL
    #[arg(long, env = "LEAGUE_DATABASE_URL", default_value = "sqlite::memory:")]
    pub database_url: String,

    /// Seed for the random number generator, for repeatable seasons
    #[arg(long, env = "LEAGUE_SEED")]
    pub seed: Option<u64>,

    /// Games per post-season series, overriding the setup file
    #[arg(long, env = "LEAGUE_SERIES_LENGTH")]
    pub series_length: Option<u8>,

    /// Print standings and series as JSON instead of tables
    #[arg(long, env = "LEAGUE_JSON", default_value = "false")]
    pub json: bool,
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.series_length == Some(0) {
            return Err(Error::InvalidInput("series length must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn series_length_or(&self, setup_length: u8) -> u8 {
        self.series_length.unwrap_or(if setup_length == 0 { Series::DEFAULT_LENGTH } else { setup_length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_in_memory() {
        let config = Config::try_parse_from(["league-sim"]).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.setup, PathBuf::from("data/league.json"));
        assert!(!config.json);
        assert_eq!(config.series_length_or(5), 5);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "league-sim", "--seed", "42", "--series-length", "5", "--json",
            "--database-url", "sqlite://league.db",
        ]).unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.series_length_or(3), 5);
        assert!(config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_series_length_is_rejected() {
        let config = Config::try_parse_from(["league-sim", "--series-length", "0"]).unwrap();
        assert!(config.validate().is_err());
    }
}
