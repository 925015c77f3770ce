//! classmap - PHP autoloader class map generator.
//!
//! Usage:
//!   classmap generate <ROOT>... -o <OUT>   Scan source trees and write a table
//!   classmap find <FILE|->                 List declarations in one file
//!   classmap lookup <TABLE> <NAME>         Resolve a name through a table
//!   classmap --help                        Show help

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use classmap_core::{DebugLog, DeclarationMap, ScanOptions};
use classmap_scan::{DeclarationScanner, TreeWalker};
use classmap_table::{ClassLoader, TableSource, TableWriter};

#[derive(Parser)]
#[command(
    name = "classmap",
    version,
    about = "Generates PHP autoloader class maps",
    long_about = "classmap scans PHP source trees for class, interface, trait and enum\n\
                  declarations and writes a table mapping each fully-qualified name to\n\
                  the file declaring it."
)]
struct Cli {
    /// Enable debug logging to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan one or more source trees and write a class map table
    Generate {
        /// Directories to scan, merged in order (later roots win)
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Destination table file
        #[arg(short, long)]
        output: PathBuf,

        /// Scan options as JSON (command line lists are appended)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Additional directory name fragment to exclude
        #[arg(long = "exclude-dir", value_name = "DIR")]
        exclude_dirs: Vec<String>,

        /// Additional file name pattern to exclude (`*` wildcards allowed)
        #[arg(long = "exclude-file", value_name = "PATTERN")]
        exclude_files: Vec<String>,

        /// Additional file extension to parse, e.g. `.phtml`
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Only scan the top level of each root
        #[arg(long)]
        no_recursive: bool,

        /// Follow symbolic links to directories
        #[arg(long)]
        follow_symlinks: bool,

        /// Number of scanner threads (0 = one per core)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Print the collected scan decisions after writing the table
        #[arg(short, long)]
        debug: bool,

        /// Template for the debug output; `%s` is replaced by the messages
        #[arg(long, default_value = "%s", requires = "debug")]
        debug_wrap: String,
    },

    /// List the declarations found in a single file
    Find {
        /// File to scan, or `-` to read source from stdin
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve a type name through an existing table
    Lookup {
        /// Table file written by `generate`
        table: PathBuf,

        /// Fully-qualified type name, e.g. `App\Model\User`
        name: String,
    },
}

/// `find` argument that reads source from stdin.
const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate {
            roots,
            output,
            config,
            exclude_dirs,
            exclude_files,
            extensions,
            no_recursive,
            follow_symlinks,
            threads,
            debug,
            debug_wrap,
        } => {
            let mut options = match config {
                Some(path) => read_options(&path)?,
                None => ScanOptions::default(),
            };
            options.extend(exclude_dirs, exclude_files, extensions);
            options.recursive &= !no_recursive;
            options.follow_symlinks |= follow_symlinks;
            options.enable_debug |= debug;
            if let Some(threads) = threads {
                options.threads = threads;
            }

            run_generate(&roots, &output, options, debug.then_some(debug_wrap.as_str()))?;
        }
        Command::Find { file, format } => {
            run_find(&file, format)?;
        }
        Command::Lookup { table, name } => {
            run_lookup(table, &name)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load scan options from a JSON file.
fn read_options(path: &Path) -> Result<ScanOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Couldn't read options from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid options in {}", path.display()))
}

/// Scan all roots and write the sorted table.
fn run_generate(
    roots: &[PathBuf],
    output: &Path,
    options: ScanOptions,
    debug_wrap: Option<&str>,
) -> Result<()> {
    let log = Arc::new(DebugLog::new(options.enable_debug));
    let walker = TreeWalker::with_log(options, Arc::clone(&log)).context("Invalid scan options")?;

    for root in roots {
        eprintln!("Scanning {}...", root.display());
    }
    let mut found = walker.scan_roots(roots);
    found.sort_keys();

    TableWriter::new()
        .write(&found, output)
        .context("Couldn't write class map table")?;
    eprintln!(
        "Wrote {} declarations to {}",
        found.len(),
        output.display()
    );

    if let Some(wrap) = debug_wrap {
        println!("{}", log.formatted("\n", wrap)?);
    }

    Ok(())
}

/// Declarations in `file`, or in source read from `stdin` when `file` is `-`.
fn find_declarations(file: &Path, mut stdin: impl Read) -> Result<DeclarationMap> {
    let scanner = DeclarationScanner::new(Arc::new(DebugLog::disabled()));
    if file == Path::new(STDIN_PATH) {
        let mut source = Vec::new();
        stdin
            .read_to_end(&mut source)
            .context("Couldn't read source from stdin")?;
        return Ok(scanner.scan_source(&source, STDIN_PATH));
    }
    scanner
        .extract_declarations(file)
        .context("Couldn't scan file")
}

/// Print the declarations of a single file.
fn run_find(file: &Path, format: OutputFormat) -> Result<()> {
    let found = find_declarations(file, std::io::stdin().lock())?;

    match format {
        OutputFormat::Text => {
            if found.is_empty() {
                eprintln!("No declarations found in {}", file.display());
            }
            for name in found.keys() {
                println!("{name}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
    }

    Ok(())
}

/// Print the file declaring `name` according to `table`.
fn run_lookup(table: PathBuf, name: &str) -> Result<()> {
    let loader = ClassLoader::new(TableSource::Path(table));
    match loader.resolve(name)? {
        Some(path) => println!("{}", path.display()),
        None => bail!("{name} is not in the class map"),
    }
    Ok(())
}
