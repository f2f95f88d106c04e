use std::{fs, path::PathBuf};

use crate::{
    config::Config,
    error::{Error, Result},
    formats::{FormatContext, FormatRegistry},
    schema::TokenOrGroup,
    source::{load_sources, source_files},
    tokens::Dictionary,
    transforms::TransformRegistry,
};

/// One rendered output file, not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub platform: String,
    pub path: PathBuf,
    pub contents: String,
}

/// Loads tokens once and renders every configured platform through the
/// transform and format registries.
pub struct TokenPipeline {
    config: Config,
    transforms: TransformRegistry,
    formats: FormatRegistry,
}

impl TokenPipeline {
    pub fn new(config: Config) -> Self {
        Self::with_registries(config, TransformRegistry::default(), FormatRegistry::default())
    }

    pub fn with_registries(
        config: Config,
        transforms: TransformRegistry,
        formats: FormatRegistry,
    ) -> Self {
        TokenPipeline {
            config,
            transforms,
            formats,
        }
    }

    pub fn transforms_mut(&mut self) -> &mut TransformRegistry {
        &mut self.transforms
    }

    pub fn formats_mut(&mut self) -> &mut FormatRegistry {
        &mut self.formats
    }

    /// Reads, merges and resolves every token source.
    pub fn load(&self) -> Result<Dictionary> {
        let files = source_files(&self.config.base_dir, &self.config.source)?;
        let merged = load_sources(&files, &self.config.preprocessors)?;
        let document: TokenOrGroup =
            serde_json::from_value(merged).map_err(|source| Error::Json {
                path: files[0].clone(),
                source,
            })?;
        Dictionary::from_document(&document)
    }

    /// Renders every file of one platform without touching the filesystem.
    pub fn render_platform(&self, name: &str, dictionary: &Dictionary) -> Result<Vec<RenderedFile>> {
        let platform = self.config.platform(name)?;
        let mut tokens = dictionary.tokens().to_vec();
        self.transforms
            .apply(&platform.transforms, &mut tokens, &platform.options)?;

        let build_dir = self.config.build_dir(platform);
        platform
            .files
            .iter()
            .map(|file| {
                let selected: Vec<_> = match file.filter {
                    Some(token_type) => tokens
                        .iter()
                        .filter(|token| token.token_type == token_type)
                        .cloned()
                        .collect(),
                    None => tokens.clone(),
                };
                let context = FormatContext {
                    platform: name,
                    tokens: &selected,
                    options: &platform.options,
                };
                let contents = self.formats.format(&file.format, &context)?;
                Ok(RenderedFile {
                    platform: name.to_string(),
                    path: build_dir.join(&file.destination),
                    contents,
                })
            })
            .collect()
    }

    /// Renders every platform. Nothing is written when any of them fails.
    pub fn render_all_platforms(&self, dictionary: &Dictionary) -> Result<Vec<RenderedFile>> {
        let mut rendered = Vec::new();
        for name in self.config.platforms.keys() {
            tracing::debug!(platform = %name, "rendering platform");
            rendered.extend(self.render_platform(name, dictionary)?);
        }
        Ok(rendered)
    }

    /// Removes every configured output file.
    pub fn clean_all_platforms(&self) -> Result<()> {
        for name in self.config.platforms.keys() {
            self.clean_platform(name)?;
        }
        Ok(())
    }

    /// Removes the output files of one platform, leaving the others alone.
    pub fn clean_platform(&self, name: &str) -> Result<()> {
        let platform = self.config.platform(name)?;
        let build_dir = self.config.build_dir(platform);
        for file in &platform.files {
            let path = build_dir.join(&file.destination);
            match fs::remove_file(&path) {
                Ok(()) => tracing::info!(platform = %name, path = %path.display(), "removed"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(Error::Io { path, source }),
            }
        }
        Ok(())
    }

    /// Loads the tokens, renders every platform and writes the results.
    pub fn build_all_platforms(&self) -> Result<Vec<PathBuf>> {
        let dictionary = self.load()?;
        let rendered = self.render_all_platforms(&dictionary)?;
        write_files(&rendered)
    }

    /// Same as [`TokenPipeline::build_all_platforms`] for a single platform.
    pub fn build_platform(&self, name: &str) -> Result<Vec<PathBuf>> {
        let dictionary = self.load()?;
        let rendered = self.render_platform(name, &dictionary)?;
        write_files(&rendered)
    }
}

fn write_files(rendered: &[RenderedFile]) -> Result<Vec<PathBuf>> {
    rendered
        .iter()
        .map(|file| {
            if let Some(dir) = file.path.parent() {
                fs::create_dir_all(dir).map_err(Error::io(dir))?;
            }
            fs::write(&file.path, &file.contents).map_err(Error::io(&file.path))?;
            tracing::info!(platform = %file.platform, path = %file.path.display(), "wrote");
            Ok(file.path.clone())
        })
        .collect()
}
