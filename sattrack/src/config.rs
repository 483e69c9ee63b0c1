use serde::Deserialize;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tletypes::prelude::*;
use url::Url;

use crate::ranking::PopularCatalog;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Observer location {0} is out of range")]
    InvalidObserver(ObserverLocation),
    #[error("The element source must name exactly one of 'file' or 'url'")]
    AmbiguousSource,
    #[error("No element source configured")]
    MissingSource,
    #[error("Popular satellite names must not be empty")]
    EmptyPopularName,
    #[error("Duplicate popular satellite name '{0}'")]
    DuplicatePopularName(String),
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub name: Option<String>,
    pub observer: Option<ObserverLocation>,
    pub source: Option<Source>,
    /// Replaces the built-in amateur satellite list when present
    #[serde(alias = "popular")]
    pub popular_satellites: Option<Vec<String>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Source {
    pub file: Option<PathBuf>,
    pub url: Option<Url>,
}

/// A resolved element source
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceLocation {
    File(PathBuf),
    Url(Url),
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks everything except the presence of a source, which may
    /// still come from the command line
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(observer) = self.observer {
            if !observer.is_valid() {
                return Err(ConfigError::InvalidObserver(observer));
            }
        }

        if let Some(source) = &self.source {
            if source.file.is_some() && source.url.is_some() {
                return Err(ConfigError::AmbiguousSource);
            }
        }

        let mut names = HashSet::new();
        for name in self.popular_satellites.iter().flatten() {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyPopularName);
            }
            if !names.insert(name) {
                return Err(ConfigError::DuplicatePopularName(name.clone()));
            }
        }

        Ok(())
    }

    pub fn source_location(&self) -> Result<SourceLocation, ConfigError> {
        let source = self.source.as_ref().ok_or(ConfigError::MissingSource)?;
        match (&source.file, &source.url) {
            (Some(file), None) => Ok(SourceLocation::File(file.clone())),
            (None, Some(url)) => Ok(SourceLocation::Url(url.clone())),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousSource),
            (None, None) => Err(ConfigError::MissingSource),
        }
    }

    pub fn popular_catalog(&self) -> PopularCatalog {
        match &self.popular_satellites {
            Some(names) => PopularCatalog::new(names.iter().cloned()),
            None => PopularCatalog::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn full_config() {
        let cfg = Config::from_str_checked(indoc! {r#"
            name = "home"
            popular-satellites = ["ISS (ZARYA)", "NOAA 19"]

            [observer]
            lat = 51.5
            lon = -0.12

            [source]
            url = "http://localhost:8080/api/satellites/tle"
        "#})
        .unwrap();
        assert_eq!(cfg.name.as_deref(), Some("home"));
        assert_eq!(cfg.observer, Some(ObserverLocation::new(51.5, -0.12)));
        assert!(matches!(cfg.source_location(), Ok(SourceLocation::Url(_))));
        assert!(cfg.popular_catalog().is_popular("NOAA 19"));
        assert!(!cfg.popular_catalog().is_popular("SO-50"));
    }

    #[test]
    fn defaults() {
        let cfg = Config::from_str_checked("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(matches!(cfg.source_location(), Err(ConfigError::MissingSource)));
        assert_eq!(cfg.popular_catalog(), PopularCatalog::default());
    }

    #[test]
    fn rejects_invalid_observer() {
        let err = Config::from_str_checked(indoc! {r#"
            [observer]
            latitude = 91.0
            longitude = 0.0
        "#})
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidObserver(_)));
    }

    #[test]
    fn rejects_ambiguous_source() {
        let err = Config::from_str_checked(indoc! {r#"
            [source]
            file = "elements.txt"
            url = "http://localhost/tle"
        "#})
        .unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousSource));
    }

    #[test]
    fn rejects_bad_popular_names() {
        let err = Config::from_str_checked(r#"popular-satellites = ["SO-50", " "]"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPopularName));

        let err = Config::from_str_checked(r#"popular = ["SO-50", "SO-50"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePopularName(n) if n == "SO-50"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::from_str_checked("observer = 12").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
