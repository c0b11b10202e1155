//! Command dispatch

use std::io::{self, BufRead};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, ModeArg, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, render};
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::Mode;
use crate::infrastructure::ServiceContainer;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| CliError::io("current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Analyze {
            file,
            mode,
            set,
            no_input,
            format,
        } => cmd_analyze(&container, file, *mode, set, *no_input, *format),
        Commands::Validate { file, mode } => cmd_validate(&container, file, *mode),
        Commands::Leaves { file } => cmd_leaves(&container, file),
        Commands::Tree { file } => cmd_tree(&container, file),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Mode from the flag, then the configured default, then an interactive question.
fn resolve_mode(container: &ServiceContainer, arg: Option<ModeArg>) -> CliResult<Mode> {
    if let Some(arg) = arg {
        return Ok(arg.into());
    }
    if let Some(mode) = container.settings.default_mode {
        debug!("using configured default mode {}", mode);
        return Ok(mode);
    }
    if !container.settings.interactive {
        return Err(CliError::Usage(
            "no value mode given: pass --mode or set default_mode".into(),
        ));
    }
    ask_mode(&mut io::stdin().lock())
}

fn ask_mode<R: BufRead>(input: &mut R) -> CliResult<Mode> {
    output::info("Select value mode:");
    output::detail("1. Monetary impact");
    output::detail("2. Probability of attack success");
    loop {
        output::prompt("Choice [1/2]:");
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| CliError::io("read mode choice", e))?;
        if read == 0 {
            return Err(CliError::Usage("no value mode selected".into()));
        }
        match parse_mode_choice(&line) {
            Some(mode) => return Ok(mode),
            None => output::info("Invalid choice. Please enter 1 or 2."),
        }
    }
}

fn parse_mode_choice(line: &str) -> Option<Mode> {
    match line.trim() {
        "1" => Some(Mode::Monetary),
        "2" => Some(Mode::Probability),
        other => other.parse().ok(),
    }
}

#[instrument(skip(container))]
fn cmd_analyze(
    container: &ServiceContainer,
    file: &Path,
    mode: Option<ModeArg>,
    set: &[(String, f64)],
    no_input: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let record = container.analysis.load(file)?;
    let mode = resolve_mode(container, mode)?;
    let editor = container.leaf_editor(set, no_input);

    let report = container
        .analysis
        .analyze(&record, mode, editor.as_ref())?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::InvalidData(format!("serialize report: {e}")))?;
            output::info(&json);
        }
        OutputFormat::Text => {
            let settings = &container.settings;
            output::header(&report.title);
            output::info(&render::report_tree(&report, settings));
            output::info(&render::summary(&report, settings));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer, file: &Path, mode: Option<ModeArg>) -> CliResult<()> {
    let record = container.analysis.load(file)?;
    let mode = resolve_mode(container, mode)?;
    let problems = container.analysis.check(&record, mode);

    if problems.is_empty() {
        output::success(&format!("{}: valid {} tree", file.display(), mode));
        return Ok(());
    }

    output::info(&format!("{}: {} problem(s)", file.display(), problems.len()));
    for problem in &problems {
        output::failure(problem);
    }
    Err(CliError::InvalidData(format!(
        "{} is not a valid {} tree",
        file.display(),
        mode
    )))
}

fn cmd_leaves(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (_, tree) = container.analysis.load_tree(file)?;
    for leaf in tree.leaves() {
        output::info(&format!("{}\t{}", leaf.name, leaf.value));
    }
    Ok(())
}

fn cmd_tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (record, tree) = container.analysis.load_tree(file)?;
    output::info(&render::record_tree(&record));
    output::detail(&format!(
        "{} node(s), {} edge(s), depth {}",
        tree.node_count(),
        tree.edge_count(),
        tree.depth()
    ));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Init => {
            let (dir, path) = match (global_config_dir(), global_config_path()) {
                (Some(dir), Some(path)) => (dir, path),
                _ => {
                    return Err(CliError::Usage(
                        "cannot determine config directory".into(),
                    ))
                }
            };
            if container.fs.exists(&path) {
                output::action("Exists", &path.display());
                return Ok(());
            }
            container
                .fs
                .create_dir_all(&dir)
                .with_path_context("create config directory", &dir)?;
            container
                .fs
                .write(&path, &Settings::template())
                .with_path_context("write config", &path)?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".into());
            output::info(&format!("global: {}", global));
            output::info(&format!(
                "local:  {}",
                local_config_path(project_dir).display()
            ));
        }
    }
    Ok(())
}
