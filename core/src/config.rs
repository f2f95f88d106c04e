use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    schema::TokenType,
};

/// Build configuration. Field names follow the JSON config file
/// (`source`, `buildPath`, `lineHeightUnit`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub source: Vec<String>,
    #[serde(default)]
    pub preprocessors: Vec<String>,
    pub platforms: IndexMap<String, PlatformConfig>,
    /// Directory sources and build paths are relative to.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    #[serde(default)]
    pub transforms: Vec<String>,
    pub build_path: PathBuf,
    #[serde(default)]
    pub options: PlatformOptions,
    #[serde(default)]
    pub files: Vec<FileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOptions {
    /// Breakpoint label to CSS length, smallest first.
    #[serde(default)]
    pub breakpoints: IndexMap<String, String>,
    #[serde(default)]
    pub line_height_unit: Option<String>,
    #[serde(default)]
    pub letter_spacing_unit: Option<String>,
    #[serde(default)]
    pub fallback_font_family: Option<String>,
}
impl PlatformOptions {
    pub fn letter_spacing_unit(&self) -> &str {
        self.letter_spacing_unit.as_deref().unwrap_or("px")
    }
    pub fn fallback_font_family(&self) -> &str {
        self.fallback_font_family.as_deref().unwrap_or("sans-serif")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub format: String,
    pub destination: PathBuf,
    /// Only tokens of this type are handed to the format.
    #[serde(default)]
    pub filter: Option<TokenType>,
}

impl Config {
    /// Reads a JSON config; relative paths inside it resolve against the
    /// config file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(Error::io(path))?;
        let mut config: Config = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn platform(&self, name: &str) -> Result<&PlatformConfig> {
        self.platforms
            .get(name)
            .ok_or_else(|| Error::UnknownPlatform(name.to_string()))
    }

    /// Absolute (or base-relative) output directory of a platform.
    pub fn build_dir(&self, platform: &PlatformConfig) -> PathBuf {
        self.base_dir.join(&platform.build_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        let breakpoints = [
            ("mobile", "360px"),
            ("tablet", "theme(screens.md)"),
            ("desktop", "theme(screens.xl)"),
        ]
        .into_iter()
        .map(|(label, length)| (label.to_string(), length.to_string()))
        .collect();

        let tailwindcss = PlatformConfig {
            transforms: vec!["css/typography".to_string()],
            build_path: PathBuf::from("build"),
            options: PlatformOptions {
                breakpoints,
                ..Default::default()
            },
            files: vec![FileConfig {
                format: "tailwindcss".to_string(),
                destination: PathBuf::from("app.css"),
                filter: None,
            }],
        };

        Config {
            source: vec!["tokens/tokens.json".to_string()],
            preprocessors: vec!["tokens-studio".to_string()],
            platforms: [("tailwindcss".to_string(), tailwindcss)].into_iter().collect(),
            base_dir: PathBuf::new(),
        }
    }
}
