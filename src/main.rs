mod convert;
mod files;
mod flow;
mod logging;
mod report;
mod sarif;

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::convert::Converter;
use crate::logging::init_logging;
use crate::sarif::SarifLog;

/// CLI arguments for infer2sarif execution.
#[derive(Parser, Debug)]
#[command(
    name = "infer2sarif",
    about = "Convert Infer's report.json into a SARIF 1.0.0 document.",
    version
)]
struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to Infer's report.json. Use - to read from stdin."
    )]
    input: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Where to write the SARIF document. Defaults to stdout; - also selects stdout."
    )]
    output: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH",
        default_value = ".",
        help = "Project root that file paths in the report are relative to."
    )]
    project_root: PathBuf,
    #[arg(
        long,
        help = "Attach an md5 content hash for each referenced source file that exists on disk."
    )]
    file_hashes: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging();
    let input = read_input(&cli.input)?;
    let project_root = absolute_project_root(&cli.project_root)?;
    let converter = Converter::new(project_root, cli.file_hashes);
    let run = converter.convert(&input)?;
    let sarif = SarifLog::new(run);
    let mut writer = output_writer(cli.output.as_deref())?;
    serde_json::to_writer_pretty(&mut writer, &sarif)
        .context("failed to serialize SARIF output")?;
    writer
        .write_all(b"\n")
        .context("failed to write SARIF output")?;
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read report from stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn absolute_project_root(root: &Path) -> Result<PathBuf> {
    std::path::absolute(root)
        .with_context(|| format!("failed to resolve project root {}", root.display()))
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdout())),
        Some(path) => {
            Ok(Box::new(File::create(path).with_context(|| {
                format!("failed to open {}", path.display())
            })?))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
