//! PromptRoll - CLI entry point

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use tracing::{debug, info};

use promptcore::{Field, FieldInputs, Template, missing_inputs, unmatched_placeholders};
use promptroll::cli::{Cli, Command, HistoryCommand, TemplateCommand};
use promptroll::config::Config;
use promptroll::{Clipboard, LocalFileSystem, MemoryClipboard, RollError, Store, SystemClipboard, Workbench};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptroll")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("promptroll.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("promptroll using store: {}", config.store_path.display());

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Template { command } => cmd_template(&config, command),
        Command::Generate {
            template,
            values,
            no_copy,
            strict,
        } => cmd_generate(&config, &template, &values, no_copy, strict),
        Command::History { command } => cmd_history(&config, command),
    }
}

fn open_workbench(config: &Config, copy: bool) -> Result<Workbench> {
    let store = Store::open(&config.store_path)
        .context(format!("Failed to open store at {}", config.store_path.display()))?;
    let clipboard: Box<dyn Clipboard> = if !copy {
        Box::new(MemoryClipboard::new())
    } else if let Some(command) = &config.clipboard.command {
        Box::new(SystemClipboard::with_command(command)?)
    } else {
        Box::new(SystemClipboard::detect())
    };
    Ok(Workbench::new(store, clipboard, Box::new(LocalFileSystem)))
}

fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn read_body(body: Option<String>, body_file: Option<PathBuf>) -> Result<Option<String>> {
    match (body, body_file) {
        (Some(body), _) => Ok(Some(body)),
        (None, Some(path)) => {
            let body = fs::read_to_string(&path).context(format!("Failed to read body from {}", path.display()))?;
            Ok(Some(body))
        }
        (None, None) => Ok(None),
    }
}

fn describe_field(field: &Field) -> String {
    let mut line = format!("{} ({})", field.name.bold(), field.field_type().label());
    if !field.options().is_empty() {
        line.push_str(&format!(": {}", field.options().join(" | ")));
    }
    if !field.default_value().is_empty() {
        line.push_str(&format!(" = {}", field.default_value()));
    }
    line
}

// === Templates ===

fn cmd_template(config: &Config, command: TemplateCommand) -> Result<()> {
    debug!(?command, "cmd_template: called");
    let bench = open_workbench(config, false)?;
    match command {
        TemplateCommand::List => {
            let templates = bench.templates()?;
            if templates.is_empty() {
                println!("No templates found");
            }
            for t in templates {
                println!(
                    "{}  {}  {} fields  {}",
                    t.id().to_string().yellow(),
                    t.name().bold(),
                    t.fields().len(),
                    format_time(t.created_at()).dimmed()
                );
            }
        }
        TemplateCommand::Show { template } => {
            let t = bench.resolve_template(&template)?;
            print_template(&t);
        }
        TemplateCommand::New {
            name,
            body,
            body_file,
            fields,
        } => {
            let body = read_body(body, body_file)?.unwrap_or_default();
            let t = bench.create_template(name, body, fields)?;
            println!("{} Created template: {} ({})", "✓".green(), t.name().cyan(), t.id());
            warn_unmatched(&t);
        }
        TemplateCommand::Edit {
            template,
            name,
            body,
            body_file,
            clear_fields,
            remove_fields,
            add_fields,
        } => {
            let mut t = bench.resolve_template(&template)?;
            if let Some(name) = name {
                t.set_name(name)?;
            }
            if let Some(body) = read_body(body, body_file)? {
                t.set_body(body)?;
            }
            if clear_fields {
                t.set_fields(Vec::new())?;
            }
            for field_name in remove_fields {
                let id = t
                    .field_named(&field_name)
                    .map(|f| f.id)
                    .ok_or_else(|| RollError::not_found(format!("field '{}'", field_name)))?;
                t.remove_field(id);
            }
            for field in add_fields {
                t.add_field(field)?;
            }
            bench.save_template(&t)?;
            println!("{} Updated template: {}", "✓".green(), t.name().cyan());
            warn_unmatched(&t);
        }
        TemplateCommand::Delete { template } => {
            let t = bench.resolve_template(&template)?;
            bench.delete_template(t.id())?;
            println!("{} Deleted template: {}", "✓".green(), t.name());
        }
        TemplateCommand::Export { template, output } => {
            let t = bench.resolve_template(&template)?;
            let path = bench.export_template(Some(&t), output.as_deref(), &config.export_dir())?;
            println!("{} Exported {} to {}", "✓".green(), t.name().cyan(), path.display());
        }
        TemplateCommand::Import { path } => {
            let t = bench
                .import_template(&path)
                .context(format!("Failed to import {}", path.display()))?;
            println!("{} Imported template: {} ({})", "✓".green(), t.name().cyan(), t.id());
        }
    }
    Ok(())
}

fn print_template(t: &Template) {
    println!("{} {}", t.name().bold().cyan(), format!("({})", t.id()).dimmed());
    println!("Created: {}", format_time(t.created_at()));
    println!();
    println!("{}", t.body());
    println!();
    if t.fields().is_empty() {
        println!("No fields");
    } else {
        println!("Fields:");
        for field in t.fields() {
            println!("  {}", describe_field(field));
        }
    }
    warn_unmatched(t);
}

fn warn_unmatched(t: &Template) {
    for name in unmatched_placeholders(t) {
        eprintln!("{} placeholder {{{{{}}}}} has no field and will be left as is", "!".yellow(), name);
    }
}

// === Generation ===

fn cmd_generate(
    config: &Config,
    template: &str,
    values: &[(String, String)],
    no_copy: bool,
    strict: bool,
) -> Result<()> {
    debug!(%template, value_count = values.len(), no_copy, strict, "cmd_generate: called");
    let bench = open_workbench(config, !no_copy)?;
    let t = bench.resolve_template(template)?;

    let mut inputs = FieldInputs::new();
    for (name, value) in values {
        inputs.set_named(&t, name, value.clone())?;
    }

    let missing: Vec<String> = missing_inputs(&t, inputs.values())
        .into_iter()
        .map(|f| f.name.clone())
        .collect();
    if !missing.is_empty() {
        if strict {
            bail!("No value for: {}", missing.join(", "));
        }
        for name in &missing {
            eprintln!("{} no value for {}, using empty text", "!".yellow(), name.bold());
        }
    }

    let generation = bench.generate(&t, &mut inputs)?;
    println!("{}", generation.content());
    if !no_copy {
        match &generation.copy_error {
            None => eprintln!("{} Copied to clipboard", "✓".green()),
            Some(e) => eprintln!("{} Not copied to clipboard: {}", "!".yellow(), e),
        }
    }
    Ok(())
}

// === History ===

fn cmd_history(config: &Config, command: HistoryCommand) -> Result<()> {
    debug!(?command, "cmd_history: called");
    let copy = matches!(command, HistoryCommand::Copy { .. });
    let bench = open_workbench(config, copy)?;
    match command {
        HistoryCommand::List { template } => {
            let records: Vec<_> = bench
                .history()?
                .into_iter()
                .filter(|r| template.as_deref().is_none_or(|name| r.template_name() == name))
                .collect();
            if records.is_empty() {
                println!("No history found");
            }
            for r in records {
                println!(
                    "{}  {}  {}  {}",
                    r.id().to_string().yellow(),
                    format_time(r.created_at()).dimmed(),
                    r.template_name().bold(),
                    r.preview(60)
                );
            }
        }
        HistoryCommand::Show { id } => {
            let r = bench.resolve_history(&id)?;
            println!(
                "{} {}",
                r.template_name().bold().cyan(),
                format!("({})", format_time(r.created_at())).dimmed()
            );
            println!("{}", r.content());
        }
        HistoryCommand::Copy { id } => {
            let r = bench.resolve_history(&id)?;
            bench.copy_history(r.id())?;
            println!("{} Copied to clipboard", "✓".green());
        }
        HistoryCommand::Delete { id } => {
            let r = bench.resolve_history(&id)?;
            bench.delete_history(r.id())?;
            println!("{} Deleted history entry {}", "✓".green(), r.id());
        }
    }
    Ok(())
}
