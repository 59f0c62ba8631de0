//! Configure command handler for display mode and provider settings.

use anyhow::{Context, Result, bail};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use std::fmt;
use std::path::Path;

use crate::config::{ConfigFile, ConfigManager, ResolveOptions, Settings, resolve_settings};
use crate::display::DisplayMode;
use crate::translation::{DEFAULT_API_URL, ProviderKind};
use crate::ui::Style;

use super::config_manager;

/// Runs the configure command.
///
/// Prompts for the display mode, the provider, and that provider's
/// connection fields, then saves them to the config file. An existing file
/// that does not parse is left alone and reported.
pub fn run_configure(config: Option<&Path>) -> Result<()> {
    let manager = config_manager(config)?;
    let config_file = manager.load_existing().with_context(|| {
        format!(
            "Refusing to overwrite {}; fix or remove it first",
            manager.config_path().display()
        )
    })?;

    settle_cancellation(
        prompt_and_save(&manager, config_file),
        manager.config_path(),
    )
}

/// Ctrl+C or Escape at any prompt ends the command without saving.
fn settle_cancellation(result: Result<()>, config_path: &Path) -> Result<()> {
    match result {
        Err(e) if is_cancelled(&e) => {
            crate::info!("\nCancelled; {} left unchanged.", config_path.display());
            Ok(())
        }
        other => other,
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}

fn prompt_and_save(manager: &ConfigManager, mut config_file: ConfigFile) -> Result<()> {
    let current = resolve_settings(&ResolveOptions::default(), &config_file);

    let display_mode = select_display_mode(current.display_mode)?;
    let provider = select_provider(current.provider)?;

    match provider {
        ProviderKind::MTran => configure_mtran(&mut config_file)?,
        ProviderKind::OpenAi => configure_openai(&mut config_file)?,
    }

    config_file.ct.display_mode = Some(display_mode.as_str().to_string());
    config_file.ct.provider = Some(provider.as_str().to_string());

    manager.save(&config_file)?;

    println!();
    println!(
        "{} Configured: provider={}, display_mode={}",
        Style::success("✓"),
        Style::value(provider.display_name()),
        Style::value(display_mode)
    );
    println!(
        "  {}",
        Style::secondary(format!("saved to {}", manager.config_path().display()))
    );

    Ok(())
}

fn select_display_mode(current: DisplayMode) -> Result<DisplayMode> {
    let options = vec![
        "inline - annotation above the comment under the cursor",
        "hover - tooltip when the pointer rests on a comment",
    ];
    let starting = usize::from(current == DisplayMode::Hover);

    let selection = Select::new("Display mode:", options)
        .with_starting_cursor(starting)
        .prompt()?;

    Ok(DisplayMode::normalize(
        selection.split(" - ").next().unwrap_or(selection),
    ))
}

fn select_provider(current: ProviderKind) -> Result<ProviderKind> {
    let options: Vec<String> = ProviderKind::ALL
        .iter()
        .map(|p| format!("{} - {}", p.as_str(), p.description()))
        .collect();
    let starting = ProviderKind::ALL
        .iter()
        .position(|p| *p == current)
        .unwrap_or(0);

    let selection = Select::new("Translation provider:", options)
        .with_starting_cursor(starting)
        .prompt()?;

    Ok(ProviderKind::normalize(
        selection.split(" - ").next().unwrap_or(&selection),
    ))
}

fn configure_mtran(config_file: &mut ConfigFile) -> Result<()> {
    let default_url = config_file
        .mtran
        .api_url
        .clone()
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let api_url = Text::new("MTran API URL:")
        .with_default(&default_url)
        .with_help_message("Base URL of the MTran server")
        .prompt()?;
    config_file.mtran.api_url = Some(api_url.trim().to_string());

    config_file.mtran.api_token = prompt_token(
        "MTran token:",
        config_file.mtran.api_token.as_deref(),
        config_file.mtran.api_token_env.as_deref(),
    )?;

    Ok(())
}

fn configure_openai(config_file: &mut ConfigFile) -> Result<()> {
    let mut endpoint = Text::new("Chat endpoint:")
        .with_help_message("Base URL or full chat completions URL");
    if let Some(current) = config_file.openai.endpoint.as_deref() {
        endpoint = endpoint.with_default(current);
    }
    let endpoint = endpoint.prompt()?;
    if endpoint.trim().is_empty() {
        bail!("Endpoint cannot be empty");
    }

    let mut model = Text::new("Model:");
    if let Some(current) = config_file.openai.model.as_deref() {
        model = model.with_default(current);
    }
    let model = model.prompt()?;
    if model.trim().is_empty() {
        bail!("Model name cannot be empty");
    }

    config_file.openai.endpoint = Some(endpoint.trim().to_string());
    config_file.openai.model = Some(model.trim().to_string());
    config_file.openai.token = prompt_token(
        "Bearer token:",
        config_file.openai.token.as_deref(),
        config_file.openai.token_env.as_deref(),
    )?;

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenAction {
    Keep,
    Replace,
    Clear,
}

impl TokenAction {
    const CHOICES: [Self; 3] = [Self::Keep, Self::Replace, Self::Clear];
}

impl fmt::Display for TokenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "Keep current token",
            Self::Replace => "Enter a new token",
            Self::Clear => "Clear token",
        })
    }
}

/// Prompts for a literal token.
///
/// A stored token is only dropped by choosing "Clear token".
fn prompt_token(
    message: &str,
    current: Option<&str>,
    token_env: Option<&str>,
) -> Result<Option<String>> {
    let action = if current.is_some_and(|t| !t.trim().is_empty()) {
        Select::new(message, TokenAction::CHOICES.to_vec()).prompt()?
    } else {
        TokenAction::Replace
    };

    let input = if action == TokenAction::Replace {
        let help = token_env.map_or_else(
            || "Leave blank to keep the current value".to_string(),
            |env| format!("Leave blank to keep the current value or use ${env}"),
        );
        Password::new(message)
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_help_message(&help)
            .prompt()?
    } else {
        String::new()
    };

    Ok(token_after(current, action, &input))
}

fn token_after(current: Option<&str>, action: TokenAction, input: &str) -> Option<String> {
    let input = input.trim();
    match action {
        TokenAction::Clear => None,
        TokenAction::Replace if !input.is_empty() => Some(input.to_string()),
        TokenAction::Keep | TokenAction::Replace => current.map(str::to_string),
    }
}

/// Prints the effective configuration.
pub fn show_config(config: Option<&Path>, options: &ResolveOptions) -> Result<()> {
    let manager = config_manager(config)?;
    let config_file = manager.load_existing()?;
    let settings = resolve_settings(options, &config_file);

    print_settings(&settings);
    println!();
    println!(
        "{} {}",
        Style::label("config file"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("{}", Style::header("Current configuration"));
    println!("  {}      {}", Style::label("provider"), Style::value(settings.provider));
    println!("  {}          {}", Style::label("from"), Style::code(&settings.from));
    println!("  {}            {}", Style::label("to"), Style::code(&settings.to));
    println!("  {}  {}", Style::label("display_mode"), Style::value(settings.display_mode));
    println!(
        "  {}  {}",
        Style::label("auto_enabled"),
        Style::value(settings.auto_enabled)
    );
    println!(
        "  {}   {}",
        Style::label("debounce_ms"),
        Style::value(settings.debounce_ms)
    );

    println!();
    println!("{}", Style::header("MTran"));
    println!("  {}       {}", Style::label("api_url"), Style::value(&settings.api_url));
    println!("  {}     {}", Style::label("api_token"), token_status(settings.api_token.as_deref()));

    println!();
    println!("{}", Style::header("Chat endpoint"));
    println!(
        "  {}      {}",
        Style::label("endpoint"),
        or_not_set(&settings.chat_endpoint)
    );
    println!("  {}         {}", Style::label("model"), or_not_set(&settings.chat_model));
    println!("  {}         {}", Style::label("token"), token_status(settings.chat_token.as_deref()));
    println!(
        "  {} {}",
        Style::label("system_prompt"),
        settings
            .chat_system_prompt
            .as_deref()
            .map_or_else(|| Style::secondary("(default)"), Style::value)
    );
}

fn or_not_set(value: &str) -> String {
    if value.trim().is_empty() {
        Style::secondary("(not set)")
    } else {
        Style::value(value)
    }
}

fn token_status(token: Option<&str>) -> String {
    if token.is_some() {
        Style::success("(set)")
    } else {
        Style::secondary("(not set)")
    }
}
