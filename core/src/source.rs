use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    error::{Error, Result},
    preprocess::preprocessor,
};

/// Expands the source patterns relative to `base_dir`. Matches of one
/// pattern are sorted; patterns keep their configured order.
pub fn source_files(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let full = base_dir.join(pattern);
        let full = full.to_string_lossy();
        let paths = glob::glob(&full).map_err(|source| Error::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let mut matched: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
        matched.sort();
        if matched.is_empty() {
            tracing::warn!(%pattern, "source pattern matched no files");
        }
        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    if files.is_empty() {
        return Err(Error::NoSources(patterns.to_vec()));
    }
    Ok(files)
}

/// Reads every source, runs the preprocessors on it and deep-merges the
/// results in order.
pub fn load_sources(files: &[PathBuf], preprocessors: &[String]) -> Result<Value> {
    let preprocessors = preprocessors
        .iter()
        .map(|name| preprocessor(name))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = Value::Object(Default::default());
    for path in files {
        tracing::debug!(path = %path.display(), "reading token source");
        let text = fs::read_to_string(path).map_err(Error::io(path))?;
        let mut document: Value = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        for preprocess in &preprocessors {
            preprocess(&mut document);
        }
        merge(&mut merged, document, &mut Vec::new());
    }
    Ok(merged)
}

fn is_token(value: &Value) -> bool {
    value.get("value").is_some() || value.get("$value").is_some()
}

/// Later documents win. Tokens are replaced whole, groups are merged key by key.
fn merge(target: &mut Value, source: Value, path: &mut Vec<String>) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        if is_token(existing) || is_token(&value) {
                            path.push(key);
                            tracing::warn!(token = %path.join("."), "token collision, later source wins");
                            path.pop();
                            *existing = value;
                        } else {
                            path.push(key);
                            merge(existing, value, path);
                            path.pop();
                        }
                    }
                    Some(existing) => *existing = value,
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
