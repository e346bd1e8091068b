use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::eyre;

use crate::catalog::RouteParams;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "ecoleta",
    version,
    about = "Find recycling collection points near you",
    allow_negative_numbers = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// State abbreviation (e.g., "SP"), defaults to the last search
    #[arg(long)]
    pub uf: Option<String>,

    /// City name (e.g., "Sao Paulo"), defaults to the last search
    #[arg(long)]
    pub city: Option<String>,

    /// Base URL of the collection point API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Device latitude used to center the map
    #[arg(long, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Device longitude used to center the map
    #[arg(long, requires = "latitude")]
    pub longitude: Option<f64>,

    /// Deny location access for this run
    #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
    pub no_location: bool,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Apply or revert the catalog database schema
    Migrate {
        direction: MigrationDirection,

        /// Path of the SQLite database file
        #[arg(long)]
        database: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationDirection {
    Up,
    Down,
}

impl Args {
    /// Fold command line overrides into the loaded configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            config.location.enabled = true;
            config.location.latitude = Some(latitude);
            config.location.longitude = Some(longitude);
        }
        if self.no_location {
            config.location.enabled = false;
        }
    }

    /// City and state to open, from the arguments or the last search.
    ///
    /// A flag given on its own is completed from the last search.
    pub fn route(&self, config: &AppConfig) -> color_eyre::Result<RouteParams> {
        let last = config.last_search.as_ref();
        let uf = self
            .uf
            .clone()
            .or_else(|| last.map(|s| s.uf.clone()))
            .filter(|uf| !uf.trim().is_empty());
        let city = self
            .city
            .clone()
            .or_else(|| last.map(|s| s.city.clone()))
            .filter(|city| !city.trim().is_empty());

        match (uf, city) {
            (Some(uf), Some(city)) => Ok(RouteParams::new(uf, city)),
            _ => Err(eyre!(
                "No city selected: pass --uf and --city (e.g. --uf SP --city \"Sao Paulo\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ecoleta").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_route_from_flags() {
        let args = parse(&["--uf", "sp", "--city", "Sao Paulo"]);
        let route = args.route(&AppConfig::default()).unwrap();
        assert_eq!(route, RouteParams::new("sp", "Sao Paulo"));
    }

    #[test]
    fn test_route_falls_back_to_last_search() {
        let config = AppConfig {
            last_search: Some(SearchConfig {
                uf: "PE".to_string(),
                city: "Recife".to_string(),
            }),
            ..AppConfig::default()
        };

        assert_eq!(parse(&[]).route(&config).unwrap(), RouteParams::new("PE", "Recife"));
        assert_eq!(
            parse(&["--city", "Olinda"]).route(&config).unwrap(),
            RouteParams::new("PE", "Olinda")
        );
    }

    #[test]
    fn test_route_requires_city() {
        assert!(parse(&["--uf", "SP"]).route(&AppConfig::default()).is_err());
        assert!(parse(&["--uf", "SP", "--city", " "]).route(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        parse(&["--api-url", "http://10.0.2.2:3333", "--latitude", "-23.55", "--longitude", "-46.63"])
            .apply_to(&mut config);

        assert_eq!(config.api.base_url, "http://10.0.2.2:3333");
        assert!(config.location.enabled);
        assert_eq!(config.location.latitude, Some(-23.55));
        assert_eq!(config.location.longitude, Some(-46.63));

        parse(&["--no-location"]).apply_to(&mut config);
        assert!(!config.location.enabled);
    }

    #[test]
    fn test_latitude_requires_longitude() {
        assert!(Args::try_parse_from(["ecoleta", "--latitude", "-23.55"]).is_err());
    }

    #[test]
    fn test_migrate_subcommand() {
        let args = parse(&["migrate", "down", "--database", "ecoleta.sqlite"]);
        match args.command {
            Some(CliCommand::Migrate {
                direction,
                database,
            }) => {
                assert_eq!(direction, MigrationDirection::Down);
                assert_eq!(database, PathBuf::from("ecoleta.sqlite"));
            }
            None => panic!("expected the migrate subcommand"),
        }
    }
}
