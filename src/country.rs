use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::geography::Coordinate;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

const COUNTRIES_FILE: &str = "countries.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("country data file not found: {0}")]
    MissingData(String),
    #[error("country data is not valid utf-8")]
    NotUtf8,
    #[error("unable to deserialize country data: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("no country in the catalog has an exports image")]
    NoTargets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2
    pub code: String,
    /// ISO 3166-1 alpha-3, used for OEC links
    pub alpha3: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// OEC trade-data code when it differs from the alpha-3 code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oec_code: Option<String>,
    #[serde(default)]
    pub image: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Country {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Lowercase and strip everything that is not a letter or digit
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// The fixed set of guessable countries
#[derive(Debug, Clone)]
pub struct Catalog {
    countries: Vec<Country>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(countries: Vec<Country>) -> Self {
        let mut by_name = HashMap::new();
        for (idx, country) in countries.iter().enumerate() {
            by_name.insert(normalize_name(&country.name), idx);
            for alias in &country.aliases {
                // a real name always wins over another country's alias
                by_name.entry(normalize_name(alias)).or_insert(idx);
            }
        }
        Self { countries, by_name }
    }

    /// Catalog compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        let file = DATA_DIR
            .get_file(COUNTRIES_FILE)
            .ok_or_else(|| CatalogError::MissingData(COUNTRIES_FILE.to_string()))?;
        let contents = file.contents_utf8().ok_or(CatalogError::NotUtf8)?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let countries: Vec<Country> = serde_json::from_str(json)?;
        Ok(Self::new(countries))
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Countries eligible to be the target
    pub fn with_image(&self) -> Vec<&Country> {
        self.countries.iter().filter(|c| c.image).collect()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Country> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Exact match on the normalized name or one of its aliases
    pub fn find_by_name(&self, name: &str) -> Option<&Country> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(|&idx| &self.countries[idx])
    }

    /// Countries whose name or alias starts with `prefix`, sorted by name
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<&Country> {
        let key = normalize_name(prefix);
        if key.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&Country> = self
            .countries
            .iter()
            .filter(|c| {
                normalize_name(&c.name).starts_with(&key)
                    || c.aliases.iter().any(|a| normalize_name(a).starts_with(&key))
            })
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(limit);
        matches
    }
}
