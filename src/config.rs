use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE_NAME: &str = "locator.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Cleaned CSV with one row per store.
    pub dataset: PathBuf,
    /// Chain name used in headings.
    pub brand: String,
    /// Appended to every geocoding query; the dataset only covers one country.
    pub country: String,
    pub limit: usize,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub email: Option<String>,
    /// Nominatim `countrycodes` filter, kept in line with `country`.
    pub country_codes: String,
    pub timeout_secs: u64,
    pub min_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MapConfig {
    pub zoom: f64,
    pub style: String,
    /// `.html` for an interactive page, `.geojson` for plain features.
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("mcdonalds_clean.csv"),
            brand: "McDonald's".to_string(),
            country: "United States".to_string(),
            limit: 10,
            geocoder: GeocoderConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("locator/", env!("CARGO_PKG_VERSION")).to_string(),
            email: None,
            country_codes: "us".to_string(),
            timeout_secs: 15,
            min_delay_ms: 1000,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 10.0,
            style: "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json".to_string(),
            output: Some(PathBuf::from("map.html")),
        }
    }
}

impl Config {
    /// Reads `path`, or `locator.yaml` when no path is given. Only a missing
    /// default file falls back to the built-in values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(x) => (x, true),
            None => (Path::new(DEFAULT_CONFIG_FILE_NAME), false),
        };

        match fs::read_to_string(path) {
            Ok(contents) => {
                log::info!("Loading configuration from {}", path.display());
                Self::parse(&contents).with_context(|| format!("invalid config {}", path.display()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {
                log::info!("{DEFAULT_CONFIG_FILE_NAME} not found, using default configuration");
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read config {}", path.display()))
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.limit, 10);
        assert_eq!(config.country, "United States");
        assert_eq!(config.map.zoom, 10.0);
        assert_eq!(config.geocoder.min_delay_ms, 1000);
        assert_eq!(config.geocoder.country_codes, "us");
        assert!(config.geocoder.user_agent.starts_with("locator/"));
    }

    #[test]
    fn partial_file() {
        let config = Config::parse(
            r#"
dataset: data/stores.csv
brand: Dunkin'
country: Canada
geocoder:
  email: someone@example.com
  country-codes: ca
map:
  output: out/map.geojson
"#,
        )
        .unwrap();
        assert_eq!(config.dataset, PathBuf::from("data/stores.csv"));
        assert_eq!(config.brand, "Dunkin'");
        assert_eq!(config.limit, 10);
        assert_eq!(config.country, "Canada");
        assert_eq!(config.geocoder.country_codes, "ca");
        assert_eq!(config.geocoder.email.as_deref(), Some("someone@example.com"));
        assert_eq!(config.geocoder.timeout_secs, 15);
        assert_eq!(config.map.output, Some(PathBuf::from("out/map.geojson")));
        assert_eq!(config.map.zoom, 10.0);
    }

    #[test]
    fn empty_file() {
        assert_eq!(Config::parse("\n").unwrap().limit, 10);
    }

    #[test]
    fn unknown_type() {
        assert!(Config::parse("limit: ten").is_err());
    }

    #[test]
    fn explicit_missing_file() {
        assert!(Config::load(Some(Path::new("no/such/locator.yaml"))).is_err());
    }
}
