use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

use crate::cache::{CacheManager, CachedTranslator};
use crate::config::{ResolveOptions, Settings, resolve_settings};
use crate::fs::atomic_write;
use crate::input::{InputReader, SourceFile};
use crate::session::{LineTranslation, translate_comment_line};
use crate::translation::{HttpTranslator, Translator, validate_language, validate_source_language};
use crate::ui::{Spinner, Style};

use super::{NOT_A_COMMENT, config_manager};

pub struct LineOptions {
    pub text: Option<String>,
    pub resolve: ResolveOptions,
    pub config: Option<PathBuf>,
    pub no_cache: bool,
}

pub struct FileOptions {
    pub file: String,
    pub line: u32,
    pub write: bool,
    pub resolve: ResolveOptions,
    pub config: Option<PathBuf>,
    pub no_cache: bool,
}

/// Translates one comment line and prints the rebuilt line to stdout.
pub async fn run_line(options: LineOptions) -> Result<()> {
    let settings = load_settings(&options.resolve, options.config.as_deref())?;
    let source = InputReader::read_line(options.text.as_deref())?;

    if let Some(result) = translate(&settings, &source, options.no_cache).await? {
        println!("{}", result.line);
    }

    Ok(())
}

/// Translates the comment on one line of a file, printing the rebuilt line
/// or rewriting the file with `--write`.
pub async fn run_file(options: FileOptions) -> Result<()> {
    let settings = load_settings(&options.resolve, options.config.as_deref())?;
    let mut source_file = SourceFile::parse(&InputReader::read_file(&options.file)?);
    let source = source_file.line(options.line)?.to_string();

    let Some(result) = translate(&settings, &source, options.no_cache).await? else {
        return Ok(());
    };

    if options.write {
        source_file.replace_line(options.line, &result.line)?;
        atomic_write(Path::new(&options.file), &source_file.contents())?;
        crate::info!(
            "{} Comment translated: {}:{}",
            Style::success("✓"),
            Style::secondary(&options.file),
            options.line
        );
    } else {
        println!("{}", result.line);
    }

    Ok(())
}

fn load_settings(options: &ResolveOptions, config: Option<&Path>) -> Result<Settings> {
    if let Some(from) = &options.from {
        validate_source_language(from)?;
    }
    if let Some(to) = &options.to {
        validate_language(to)?;
    }

    let config_file = config_manager(config)?.load_existing()?;
    Ok(resolve_settings(options, &config_file))
}

async fn translate(
    settings: &Settings,
    source: &str,
    no_cache: bool,
) -> Result<Option<LineTranslation>> {
    let translator: Box<dyn Translator> = if no_cache {
        Box::new(HttpTranslator::new())
    } else {
        Box::new(CachedTranslator::new(HttpTranslator::new(), CacheManager::new()?))
    };

    let spinner = Spinner::new("Translating...");
    let result = translate_comment_line(translator.as_ref(), settings, source).await;
    spinner.stop();

    let result = result.map_err(|e| anyhow!("Translate failed: {e}"))?;
    if result.is_none() {
        crate::warn!("{}", Style::warning(NOT_A_COMMENT));
    }

    Ok(result)
}
