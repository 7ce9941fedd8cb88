use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use csvw::{config::Config, metadata::Metadata, CsvwGenerator};
use enum_dispatch::enum_dispatch;
use log::{debug, info};
use spinners::{Spinner, Spinners, Stream};

use crate::display::display_columns;
use crate::error::CsvwCliResult;

const DEFAULT_PROGRESS_SPINNER: Spinners = Spinners::Dots;
const COMPLETE_PROGRESS_STRING: &str = "✔";
const RUNNING_TAIL_STRING: &str = "...";
const FETCHING_METADATA_STRING: &str = "Fetching metadata";

fn write_output<U>(output: &str, output_file: Option<U>) -> CsvwCliResult<()>
where
    U: AsRef<Path>,
{
    if let Some(output_file) = output_file {
        let mut f = File::create(output_file).context("Failed to write output")?;
        writeln!(f, "{output}")?;
    } else {
        let mut stdout_lock = std::io::stdout().lock();
        writeln!(stdout_lock, "{output}")?;
    };
    Ok(())
}

/// Reads metadata from `metadata_file` when given, otherwise fetches it from
/// the configured URL.
async fn load_metadata(
    generator: &CsvwGenerator,
    metadata_file: Option<&Path>,
    quiet: bool,
) -> CsvwCliResult<Metadata> {
    if let Some(path) = metadata_file {
        info!("Reading metadata from {}", path.display());
        return Ok(Metadata::from_file(path)?);
    }
    let sp = (!quiet).then(|| {
        Spinner::with_timer_and_stream(
            DEFAULT_PROGRESS_SPINNER,
            FETCHING_METADATA_STRING.to_string() + RUNNING_TAIL_STRING,
            Stream::Stderr,
        )
    });
    let metadata = generator.fetch_metadata().await;
    if let Some(mut s) = sp {
        s.stop_with_symbol(COMPLETE_PROGRESS_STRING);
    }
    Ok(metadata?)
}

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    async fn run(&self, config: Config) -> CsvwCliResult<()>;
}

/// The `generate` command writes the CSVW document for the configured dataset.
#[derive(Args, Debug, Default)]
pub struct GenerateCommand {
    #[arg(
        long,
        value_name = "PATH",
        help = "Read metadata JSON from a file instead of fetching it"
    )]
    metadata_file: Option<PathBuf>,
    #[arg(short = 'o', long, help = "Output file to place the document")]
    output_file: Option<PathBuf>,
    #[arg(long, help = "Pretty-print the JSON document")]
    pretty: bool,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for GenerateCommand {
    async fn run(&self, config: Config) -> CsvwCliResult<()> {
        info!("Running `generate` subcommand");
        let generator = CsvwGenerator::new_with_config(config)?;
        let metadata = load_metadata(&generator, self.metadata_file.as_deref(), self.quiet).await?;
        let document = generator.generate(&metadata)?;
        debug!("{document:#?}");
        let output = generator.render(&document, self.pretty)?;
        write_output(&output, self.output_file.as_deref())?;
        Ok(())
    }
}

/// The `columns` command shows the table schema columns that would be generated.
#[derive(Args, Debug)]
pub struct ColumnsCommand {
    #[arg(
        long,
        value_name = "PATH",
        help = "Read metadata JSON from a file instead of fetching it"
    )]
    metadata_file: Option<PathBuf>,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for ColumnsCommand {
    async fn run(&self, config: Config) -> CsvwCliResult<()> {
        info!("Running `columns` subcommand");
        let generator = CsvwGenerator::new_with_config(config)?;
        let metadata = load_metadata(&generator, self.metadata_file.as_deref(), self.quiet).await?;
        let document = generator.generate(&metadata)?;
        display_columns(&document.table_schema.columns)?;
        Ok(())
    }
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(version, about = "Generate CSVW metadata for a dataset version", long_about = None, name = "csvw")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Config file to use instead of the default location",
        global = true
    )]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Metadata URL to fetch", global = true)]
    url: Option<String>,
    #[arg(long, help = "V4 header row of the dataset CSV", global = true)]
    header: Option<String>,
    #[arg(
        long,
        help = "Fail when a header dimension is missing from the metadata",
        global = true
    )]
    strict_dimensions: bool,
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Do not show a progress spinner while fetching metadata",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    /// Applies command line overrides on top of the file configuration.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(url) = &self.url {
            config.metadata_url = url.clone();
        }
        if let Some(header) = &self.header {
            config.header_row = header.clone();
        }
        if self.strict_dimensions {
            config.strict_dimensions = true;
        }
        config
    }

    /// The requested subcommand, `generate` when none was given.
    pub fn take_command(&mut self) -> Commands {
        self.command.take().unwrap_or_else(|| {
            Commands::Generate(GenerateCommand {
                quiet: self.quiet,
                ..Default::default()
            })
        })
    }
}

/// Commands contains the list of subcommands avaliable for use in the CLI.
/// Each command should implmement the RunCommand trait and specify the list
/// of required args for that command.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// Print the CSVW document (default)
    Generate(GenerateCommand),
    /// Show the table schema columns
    Columns(ColumnsCommand),
}
