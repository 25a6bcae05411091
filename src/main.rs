//! tokensync command line interface
//!
//! ```bash
//! # Generate every platform with best-practice conventions
//! tokensync generate --light light.json --dark dark.json --values values.json --out tokens
//!
//! # Match an existing codebase
//! tokensync generate --light light.json --dark dark.json --values values.json -r app/src
//!
//! # Show what conventions a codebase uses
//! tokensync detect -r app/src --format json
//!
//! # Fail when checked-in output is stale
//! tokensync check --light light.json --dark dark.json --values values.json --out tokens
//! ```

mod cli;
mod references;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, OutputMode, ReferenceArgs, TokenArgs};
use colored::Colorize;
use references::{parse_reference_arg, ReferenceDiscovery};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceSet, Warning};
use tokensync_emitters::strip_timestamp;
use tokensync_pipeline::{Category, DetectedConventions, GenerationConfig, GenerationOutput, GenerationRequest, Generator};
use tracing::{debug, info};
use walkdir::WalkDir;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            inputs,
            references,
            out,
            dry_run,
        } => cmd_generate(&inputs, &references, &out, dry_run, cli.format).await,
        Commands::Detect { references } => cmd_detect(&references, cli.format).await,
        Commands::Check {
            inputs,
            references,
            out,
        } => cmd_check(&inputs, &references, &out, cli.format).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            if cli.format == OutputMode::Json {
                println!("{}", json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "tokensync=info",
        1 => "tokensync=debug",
        _ => "tokensync=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn cmd_generate(
    inputs: &TokenArgs,
    reference_args: &ReferenceArgs,
    out: &Path,
    dry_run: bool,
    mode: OutputMode,
) -> Result<bool> {
    let references = load_references(reference_args).await?;
    let request = build_request(inputs, references, reference_args.best_practice, true).await?;
    let output = Generator::new().generate(&request)?;

    if !dry_run {
        for file in &output.files {
            let path = output_path(out, file);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
            tokio::fs::write(&path, &file.content)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;
            debug!("Wrote {:?}", path);
        }
        info!("Wrote {} files under {:?}", output.files.len(), out);
    }

    match mode {
        OutputMode::Json => print_json(&output)?,
        OutputMode::Pretty => print_generation(&output, out, dry_run),
    }
    Ok(true)
}

async fn cmd_detect(reference_args: &ReferenceArgs, mode: OutputMode) -> Result<bool> {
    let references = load_references(reference_args).await?;
    if references.is_empty() && !reference_args.best_practice {
        debug!("No reference files found; reporting best-practice conventions");
    }
    let (conventions, warnings) =
        Generator::new().detect(&references, reference_args.best_practice, &GenerationConfig::default());

    match mode {
        OutputMode::Json => print_json(&json!({ "conventions": conventions, "warnings": warnings }))?,
        OutputMode::Pretty => {
            print_conventions(&conventions);
            print_warnings(&warnings);
        }
    }
    Ok(true)
}

/// Drift between freshly generated files and what is on disk
#[derive(Debug, Default, Serialize)]
struct CheckReport {
    up_to_date: Vec<PathBuf>,
    changed: Vec<PathBuf>,
    missing: Vec<PathBuf>,
    stale: Vec<PathBuf>,
}

impl CheckReport {
    fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.missing.is_empty() && self.stale.is_empty()
    }
}

async fn cmd_check(inputs: &TokenArgs, reference_args: &ReferenceArgs, out: &Path, mode: OutputMode) -> Result<bool> {
    let references = load_references(reference_args).await?;
    let request = build_request(inputs, references, reference_args.best_practice, false).await?;
    let output = Generator::new().generate(&request)?;

    let mut report = CheckReport::default();
    let mut expected = HashSet::new();
    for file in &output.files {
        let path = output_path(out, file);
        expected.insert(path.clone());
        match tokio::fs::read_to_string(&path).await {
            Ok(existing) if strip_timestamp(&existing) == strip_timestamp(&file.content) => {
                report.up_to_date.push(path)
            }
            Ok(_) => report.changed.push(path),
            Err(_) => report.missing.push(path),
        }
    }
    report.stale = stale_files(out, &expected);

    match mode {
        OutputMode::Json => print_json(&json!({ "check": report, "warnings": output.warnings }))?,
        OutputMode::Pretty => {
            print_warnings(&output.warnings);
            for path in &report.changed {
                println!("  {} {}", "changed".yellow(), path.display());
            }
            for path in &report.missing {
                println!("  {} {}", "missing".red(), path.display());
            }
            for path in &report.stale {
                println!("  {} {}", "stale".red(), path.display());
            }
            if report.is_clean() {
                println!("{} {} files up to date", "OK".green().bold(), report.up_to_date.len());
            } else {
                println!(
                    "{} {} changed, {} missing, {} stale",
                    "DRIFT".red().bold(),
                    report.changed.len(),
                    report.missing.len(),
                    report.stale.len()
                );
            }
        }
    }
    Ok(report.is_clean())
}

// =============================================================================
// HELPERS
// =============================================================================

/// Generated-looking files under `out` that the current run would not produce
fn stale_files(out: &Path, expected: &HashSet<PathBuf>) -> Vec<PathBuf> {
    if !out.is_dir() {
        return Vec::new();
    }
    let mut stale: Vec<PathBuf> = WalkDir::new(out)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(OutputFormat::from_extension)
                .is_some()
        })
        .filter(|path| !expected.contains(path))
        .collect();
    stale.sort();
    stale
}

fn output_path(out: &Path, file: &GeneratedFile) -> PathBuf {
    out.join(file.platform.to_string()).join(&file.filename)
}

async fn load_references(args: &ReferenceArgs) -> Result<ReferenceSet> {
    let mut references = match &args.reference_dir {
        Some(dir) => ReferenceDiscovery::default().discover(dir)?.references,
        None => ReferenceSet::new(),
    };
    for arg in &args.reference_files {
        let (role, path) = parse_reference_arg(arg)?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read reference file {:?}", path))?;
        references.insert(role, content);
    }
    Ok(references)
}

async fn read_json(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {:?}", path))
}

async fn read_optional_json(path: Option<&PathBuf>) -> Result<Option<Value>> {
    match path {
        Some(path) => Ok(Some(read_json(path).await?)),
        None => Ok(None),
    }
}

async fn build_request(
    inputs: &TokenArgs,
    references: ReferenceSet,
    best_practice: bool,
    timestamp: bool,
) -> Result<GenerationRequest> {
    let mut config: GenerationConfig = match &inputs.config {
        Some(path) => serde_json::from_value(read_json(path).await?)
            .with_context(|| format!("Invalid generation config in {:?}", path))?,
        None => GenerationConfig::default(),
    };
    if let Some(package) = &inputs.kotlin_package {
        config.kotlin_package = Some(package.clone());
    }
    if inputs.no_timestamp || !timestamp {
        config.include_timestamp = false;
    }

    let mut request = GenerationRequest::new(
        read_json(&inputs.light).await?,
        read_json(&inputs.dark).await?,
        read_json(&inputs.values).await?,
    )
    .with_references(references);
    request.typography = read_optional_json(inputs.typography.as_ref()).await?;
    request.primitives = read_optional_json(inputs.primitives.as_ref()).await?;
    if !inputs.platforms.is_empty() {
        request.platforms = inputs.platforms.iter().map(|&p| p.into()).collect();
    }
    if !inputs.categories.is_empty() {
        request.categories = inputs.categories.iter().map(|&c| Category::from(c)).collect();
    }
    request.force_best_practice = best_practice;
    if config.include_timestamp {
        request.generated_at = Some(
            chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        );
    }
    request.config = config;
    Ok(request)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

fn kind_name(warning: &Warning) -> String {
    serde_json::to_value(warning.kind)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{}[{}]: {}", "warning".yellow().bold(), kind_name(warning), warning.message);
    }
}

fn print_conventions(conventions: &DetectedConventions) {
    let source = if conventions.is_best_practice() {
        "best practice".cyan()
    } else {
        "detected".green()
    };
    println!(
        "{} conventions ({}, confidence {:.0}%)",
        "OK".green().bold(),
        source,
        conventions.overall_confidence * 100.0
    );
    let rows = [
        ("separator", format!("{:?}", conventions.separator)),
        ("naming", format!("{:?}", conventions.naming_case)),
        ("import", format!("{:?}", conventions.import_style)),
        ("scss structure", format!("{:?}", conventions.scss_structure)),
        ("hex case", format!("{:?}", conventions.hex_case)),
        ("swift container", format!("{:?}", conventions.swift_container)),
        ("kotlin", format!("{:?}", conventions.kotlin_architecture)),
        ("kotlin package", conventions.kotlin_package.clone()),
    ];
    for (label, value) in rows {
        println!("  {:<16} {}", label.dimmed(), value);
    }
    for (dimension, score) in &conventions.confidence {
        if *score < 1.0 {
            println!("  {:<16} {:.0}%", dimension.to_string().dimmed(), score * 100.0);
        }
    }
}

fn print_generation(output: &GenerationOutput, out: &Path, dry_run: bool) {
    print_warnings(&output.warnings);
    let verb = if dry_run { "Would write" } else { "Wrote" };
    println!(
        "{} {} {} file(s) to {}",
        "OK".green().bold(),
        verb,
        output.files.len(),
        out.display()
    );
    for file in &output.files {
        println!("  {:<8} {}", file.platform.to_string().cyan(), file.filename);
    }

    for analysis in &output.analysis {
        let coverage = &analysis.coverage;
        println!(
            "  {} {}: {:.0}% coverage, {} changed, {} renamed, {} removed ({} usages)",
            "diff".magenta(),
            analysis.filename,
            coverage.coverage * 100.0,
            coverage.changed.len(),
            analysis.renames.len(),
            coverage.removed.len(),
            analysis.impact.total_usages
        );
        for family in &analysis.family_renames {
            println!("       family {} -> {} ({} tokens)", family.from, family.to, family.members.len());
        }
    }
    for issue in &output.consistency.issues {
        let values: Vec<String> = issue.values.iter().map(|(f, v)| format!("{}={}", f, v)).collect();
        println!("  {} {}: {}", "mismatch".red(), issue.name, values.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokensync_common::Platform;

    #[test]
    fn test_output_path_uses_platform_dir() {
        let file = GeneratedFile::new("Colors.swift", String::new(), OutputFormat::Swift);
        assert_eq!(output_path(Path::new("out"), &file), PathBuf::from("out/ios/Colors.swift"));
        assert_eq!(file.platform, Platform::Ios);
    }

    #[test]
    fn test_stale_files_ignore_unknown_extensions() {
        let dir = TempDir::new().unwrap();
        let web = dir.path().join("web");
        std::fs::create_dir_all(&web).unwrap();
        std::fs::write(web.join("colors.css"), "").unwrap();
        std::fs::write(web.join("old.scss"), "").unwrap();
        std::fs::write(web.join("README.md"), "").unwrap();

        let expected: HashSet<PathBuf> = [web.join("colors.css")].into_iter().collect();
        assert_eq!(stale_files(dir.path(), &expected), vec![web.join("old.scss")]);
    }

    #[tokio::test]
    async fn test_build_request_from_files() {
        let dir = TempDir::new().unwrap();
        for name in ["light.json", "dark.json", "values.json"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        std::fs::write(dir.path().join("config.json"), r#"{"max_alias_depth": 5}"#).unwrap();
        let inputs = TokenArgs {
            light: dir.path().join("light.json"),
            dark: dir.path().join("dark.json"),
            values: dir.path().join("values.json"),
            typography: None,
            primitives: None,
            platforms: vec![cli::PlatformArg::Android],
            categories: vec![],
            config: Some(dir.path().join("config.json")),
            kotlin_package: Some("com.acme".to_string()),
            no_timestamp: false,
        };
        let request = build_request(&inputs, ReferenceSet::new(), false, true).await.unwrap();
        assert_eq!(request.platforms, vec![Platform::Android]);
        assert_eq!(request.config.max_alias_depth, 5);
        assert_eq!(request.config.kotlin_package.as_deref(), Some("com.acme"));
        assert!(request.generated_at.is_some());

        let unstamped = build_request(&inputs, ReferenceSet::new(), false, false).await.unwrap();
        assert!(unstamped.generated_at.is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json(&path).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid JSON"));
    }
}
