use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use reslint::analysis::count_by_severity;
use reslint::fix::FileEditor;
use reslint::{
    AnalysisConfig, AnalysisScope, Analyzer, Baseline, Config, Finding, Fix, Project, ReportFormat,
    Reporter,
};

/// reslint - Fast lint engine for Android resources
#[derive(Parser, Debug)]
#[command(name = "reslint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyze only this file; cross-file checks are relaxed
    #[arg(long, value_name = "FILE")]
    single_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print every fix alternative as a diff
    #[arg(long)]
    show_fixes: bool,

    /// Apply the first fix of each finding to the files
    #[arg(long)]
    apply_fixes: bool,

    /// Issue ids to disable (can be specified multiple times)
    #[arg(long, value_name = "ID")]
    disable: Vec<String>,

    /// Only report these issue ids (can be specified multiple times)
    #[arg(long, value_name = "ID")]
    enable_only: Vec<String>,

    /// Fail when any file cannot be parsed
    #[arg(long)]
    abort_on_parse_error: bool,

    /// Baseline file for ignoring existing issues
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Generate a baseline file from current results
    #[arg(long, value_name = "FILE")]
    generate_baseline: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("reslint v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let errors = run_analysis(&config, &cli)?;
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    config.disabled_issues.extend(cli.disable.iter().cloned());
    config.enabled_only.extend(cli.enable_only.iter().cloned());
    config.abort_on_parse_error |= cli.abort_on_parse_error;

    Ok(config)
}

/// Returns the number of error findings reported
fn run_analysis(config: &Config, cli: &Cli) -> Result<usize> {
    let start_time = Instant::now();
    let scope = match &cli.single_file {
        Some(file) => AnalysisScope::SingleFile(file.clone()),
        None => AnalysisScope::Project,
    };
    let analyzer = Analyzer::new(AnalysisConfig::from_config(config, scope.clone()));

    let (project, mut findings) = analyze(&analyzer, config, cli, &scope)?;

    if cli.apply_fixes {
        let applied = apply_fixes(&project, &findings)?;
        if !cli.quiet {
            eprintln!("{}", format!("Applied {} fixes", applied).green());
        }
        if applied > 0 {
            // Report what is left
            let (_, remaining) = analyze(&analyzer, config, cli, &scope)?;
            findings = remaining;
        }
    }

    if let Some(path) = &cli.baseline {
        let baseline = Baseline::load(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load baseline {}", path.display()))?;
        let before = findings.len();
        findings = baseline.filter_new(findings);
        info!("Baseline hides {} findings", before - findings.len());
    }

    if let Some(path) = &cli.generate_baseline {
        Baseline::from_findings(&findings)
            .save(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write baseline {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{}", format!("Baseline written to: {}", path.display()).cyan());
        }
    }

    let reporter = Reporter::new(cli.format, cli.output.clone())
        .with_fixes(cli.show_fixes, config.fix_context_lines)
        .with_color(std::io::stdout().is_terminal());
    reporter.report(&findings, &project)?;

    if !cli.quiet {
        eprintln!(
            "{}",
            format!(
                "Analyzed {} files in {:.2}s",
                project.documents.len() + project.java.len() + project.failures.len(),
                start_time.elapsed().as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(count_by_severity(&findings).0)
}

fn analyze(
    analyzer: &Analyzer,
    config: &Config,
    cli: &Cli,
    scope: &AnalysisScope,
) -> Result<(Project, Vec<Finding>)> {
    let spinner = if cli.quiet || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message("Loading project...");
    let project = Project::load(&cli.path, config, scope.clone())?;
    spinner.set_message("Analyzing...");
    let findings = analyzer.analyze(&project);
    spinner.finish_and_clear();

    Ok((project, findings))
}

/// First fix alternative of each finding, grouped per document
fn apply_fixes(project: &Project, findings: &[Finding]) -> Result<usize> {
    let mut by_document: BTreeMap<usize, Vec<&Fix>> = BTreeMap::new();
    for fix in findings.iter().filter_map(|f| f.fixes.first()) {
        by_document.entry(fix.document).or_default().push(fix);
    }

    let editor = FileEditor::new();
    let mut applied = 0;
    for (document, fixes) in by_document {
        if let Some(document) = project.documents.get(document) {
            applied += editor.apply_fixes(&document.xml, &fixes)?;
        }
    }
    Ok(applied)
}
