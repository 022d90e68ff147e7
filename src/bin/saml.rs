//! `saml` command-line tool

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use saml::integrations::VECTOR_DBS;
use saml::logging::init_logging;
use saml::{loader, schema, templates, Error, SamlConfig, ValidationResult, Validator, WorkflowDocument};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Super Agent Markup Language tools
#[derive(Parser)]
#[command(name = "saml")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./saml.{toml,yaml,json} if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate workflow documents
    Check {
        /// Documents to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON Schema of workflow documents
    Schema {
        /// Write the schema to this file instead of stdout
        #[arg(long)]
        outfile: Option<PathBuf>,
    },

    /// List example templates, or print one
    Templates {
        /// Template to print
        name: Option<String>,
    },

    /// List vector database providers and their credential fields
    Providers,

    /// Print the changes turning one document into another, as JSON
    Diff {
        /// Previously accepted document
        old: PathBuf,
        /// New document
        new: PathBuf,
    },
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a Path,
    #[serde(flatten)]
    result: ValidationResult,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SamlConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => SamlConfig::load().context("Failed to load configuration")?,
    };
    init_logging(&config);
    let validator = Validator::from_config(&config);

    match cli.command {
        Command::Check { files, json } => check(&files, json, &validator),
        Command::Schema { outfile } => {
            let schema = serde_json::to_string_pretty(&schema::editor_schema()?)
                .context("Failed to produce pretty schema.")?;
            match outfile {
                Some(outfile) => std::fs::write(&outfile, schema).with_context(|| {
                    format!("Failed to write schema to {}.", outfile.display())
                })?,
                None => println!("{}", schema),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Templates { name: Some(name) } => match templates::template(&name) {
            Some(template) => {
                print!("{}", template.yaml);
                Ok(ExitCode::SUCCESS)
            }
            None => bail!("No template named {:?}", name),
        },
        Command::Templates { name: None } => {
            for template in templates::all() {
                println!("{:<16} {}", template.name, template.description);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Providers => {
            for db in VECTOR_DBS {
                println!("{} ({})", db.name, db.provider);
                for field in db.metadata {
                    println!("    {:<28} {}", field.key, field.label);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Diff { old, new } => {
            let plan = saml::plan_changes(
                &load(&old, &validator)?,
                &load(&new, &validator)?,
                &config.default_llm,
            )?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(files: &[PathBuf], json: bool, validator: &Validator) -> anyhow::Result<ExitCode> {
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let result = loader::check_file(file, validator)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        reports.push(FileReport { file, result });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if report.result.is_clean() {
                println!("{}: valid", report.file.display());
                continue;
            }
            println!("{}:", report.file.display());
            for line in report.result.to_string().lines() {
                println!("  {}", line);
            }
        }
    }

    let all_valid = reports.iter().all(|report| report.result.valid);
    Ok(if all_valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn load(path: &Path, validator: &Validator) -> anyhow::Result<WorkflowDocument> {
    match loader::load_file(path, validator) {
        Ok(document) => Ok(document),
        Err(Error::Invalid(report)) => bail!("{} is invalid:\n{}", path.display(), report),
        Err(err) => Err(err).with_context(|| format!("Failed to load {}", path.display())),
    }
}
