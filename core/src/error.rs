use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No default breakpoint")]
    NoDefaultBreakpoint,
    #[error("No default typography token for `{group}` at breakpoint `{breakpoint}`")]
    NoDefaultTypographyToken { group: String, breakpoint: String },
    #[error("Unknown transform `{0}`")]
    UnknownTransform(String),
    #[error("Unknown format `{0}`")]
    UnknownFormat(String),
    #[error("Unknown preprocessor `{0}`")]
    UnknownPreprocessor(String),
    #[error("Unknown platform `{0}`")]
    UnknownPlatform(String),
    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No token source files matched {0:?}")]
    NoSources(Vec<String>),
    #[error("Invalid source pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Invalid token document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed token `{path}`: {reason}")]
    MalformedToken { path: String, reason: String },
    #[error("Reference `{{{reference}}}` in `{token}` does not point to a token")]
    UnresolvedReference { token: String, reference: String },
    #[error("Circular reference: {}", .0.join(" -> "))]
    CircularReference(Vec<String>),
    #[error("Typography token `{0}` must have a composite value")]
    InvalidTypography(String),
    #[error("Unsupported color modifier `{modifier}` in `{token}`")]
    UnsupportedModifier { token: String, modifier: String },
    #[error("Invalid color modifier value `{value}` in `{token}`")]
    InvalidModifierValue { token: String, value: String },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
