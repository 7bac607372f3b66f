use clap::{Parser, Subcommand};
use gotype_transpiler::config::DEFAULT_CONFIG_FILE;
use gotype_transpiler::loader::{load_package, resolve_package_dir, write_output};
use gotype_transpiler::{CompileError, Config, GenerateOptions, PackageConfig, Pipeline, convert};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gotype")]
#[command(about = "gotype - TypeScript declarations from Go types")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbose logging
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript for every package in the config file
    Generate,
    /// Convert Go declarations without a package clause
    Convert {
        /// File containing the declarations
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Use the options of this package from the config file
        #[arg(long)]
        package: Option<String>,

        /// Output as JSON with source mappings
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let ok = match cli.command {
        Commands::Generate => generate(&cli.config),
        Commands::Convert { file, stdin, package, json } => {
            convert_snippet(&cli.config, file.as_deref(), stdin, package.as_deref(), json)
        }
    };
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn init_tracing(debug: bool) {
    let default = if debug { "gotype=debug,gotype_transpiler=debug" } else { "gotype=info,gotype_transpiler=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn generate(config_path: &Path) -> bool {
    let start = Instant::now();
    let config = match Config::from_path(config_path) {
        Ok(config) => config,
        Err(err) => {
            print_error(&CompileError::from(err));
            return false;
        }
    };
    // Package paths are relative to the directory holding the config file.
    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut written = 0;
    let mut failed = false;
    for package in config.package_names() {
        debug!(package, "generating package");
        let conf = match config.package_config(package) {
            Ok(conf) => conf,
            Err(err) => {
                print_error(&CompileError::from(err));
                return false;
            }
        };

        let dir = match resolve_package_dir(root, package) {
            Ok(dir) => dir,
            Err(err) => {
                error!("{err}");
                return false;
            }
        };
        let sources = match load_package(&dir) {
            Ok(sources) => sources,
            Err(err) => {
                error!("{err}");
                return false;
            }
        };

        let pipeline = Pipeline::standard(conf.clone());
        let result = match pipeline.compile_sources(&sources, &GenerateOptions::package()) {
            Ok(result) => result,
            Err(err) => {
                print_compile_error(&err);
                return false;
            }
        };

        let output = output_path(root, &conf, &dir);
        match write_output(&output, &result.code) {
            Ok(()) => {
                print_generated(&output.display().to_string());
                written += 1;
            }
            Err(err) => {
                error!("{err}");
                failed = true;
            }
        }
    }

    print_summary(written, start.elapsed());
    !failed
}

fn output_path(root: &Path, conf: &PackageConfig, package_dir: &Path) -> PathBuf {
    let path = conf.resolved_output_path(package_dir);
    if path.is_relative() && !conf.output_path.is_empty() { root.join(path) } else { path }
}

fn convert_snippet(config_path: &Path, file: Option<&Path>, stdin: bool, package: Option<&str>, json: bool) -> bool {
    let conf = match package {
        Some(package) => match Config::from_path(config_path).and_then(|c| c.package_config(package)) {
            Ok(conf) => conf,
            Err(err) => {
                print_error(&CompileError::from(err));
                return false;
            }
        },
        None => PackageConfig::default(),
    };

    let mut source = String::new();
    let read = match (stdin, file) {
        (true, _) | (false, None) => io::stdin().read_to_string(&mut source).map(|_| ()),
        (false, Some(path)) => fs::read_to_string(path).map(|text| source = text),
    };
    if let Err(err) = read {
        error!("failed to read input: {err}");
        return false;
    }

    match convert(&source, &conf) {
        Ok(result) if json => match serde_json::to_string(&result) {
            Ok(text) => {
                println!("{text}");
                true
            }
            Err(err) => {
                error!("failed to serialize result: {err}");
                false
            }
        },
        Ok(result) => {
            print!("{}", result.code);
            true
        }
        Err(err) => {
            let filename = file.map_or("<stdin>".to_string(), |p| p.display().to_string());
            print_rendered(&err, &source, &filename);
            false
        }
    }
}

fn print_compile_error(err: &CompileError) {
    match err.path() {
        Some(path) => {
            let source = fs::read_to_string(path).unwrap_or_default();
            print_rendered(err, &source, &path.display().to_string());
        }
        None => print_error(err),
    }
}

fn print_rendered(err: &CompileError, source: &str, filename: &str) {
    if io::stderr().is_terminal() {
        eprint!("{}", err.render_color(source, filename));
    } else {
        eprint!("{}", err.render(source, filename));
    }
}

fn print_error(err: &CompileError) {
    print_rendered(err, "", "gotype");
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(count: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };

    if is_tty {
        eprintln!("\n\x1b[1m✨ Generated {} {} in {}\x1b[0m", count, files_word, time_str);
    } else {
        eprintln!("\n✨ Generated {} {} in {}", count, files_word, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
