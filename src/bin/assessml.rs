//! Command-line interface for AssessML
//! This binary compiles AssessML documents into the registered output formats.
//!
//! Usage:
//!   assessml compile `<path>` [--format `<format>`] [--config `<file>`] [--seed `<n>`]  - Compile a document
//!   assessml list-formats                                                        - List all available formats

use assessml::assessml::config::{AssessmlConfig, Loader};
use assessml::assessml::error::{FormatError, Result};
use assessml::assessml::formats::FormatRegistry;
use assessml::assessml::parsing::{parse_with, ParseOptions};
use assessml::assessml::providers::RandomPayloads;
use clap::{value_parser, Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("assessml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler for AssessML assessment documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log parser and serializer activity to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile an AssessML document")
                .arg(
                    Arg::new("path")
                        .help("Path to the AssessML file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'html', 'markup', 'json')")
                        .default_value("html"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in defaults"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for random variable values, shuffles and group names")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(Command::new("list-formats").about("List output formats"))
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("compile", compile_matches)) => {
            let Some(path) = compile_matches.get_one::<String>("path") else {
                unreachable!("path is required")
            };
            let format = compile_matches
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("html");
            let config_path = compile_matches.get_one::<String>("config");
            let seed = compile_matches.get_one::<u64>("seed").copied();
            handle_compile_command(path, format, config_path, seed);
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(config_path: Option<&String>, seed: Option<u64>) -> Result<AssessmlConfig> {
    let mut loader = Loader::new();
    if let Some(path) = config_path {
        loader = loader.with_file(path);
    }
    if let Some(seed) = seed {
        loader = loader.set_override("random.seed", seed)?;
    }
    Ok(loader.build()?)
}

fn compile_file(path: &str, format: &str, config: &AssessmlConfig) -> Result<String> {
    let registry = FormatRegistry::from_config(config);
    if !registry.has(format) {
        return Err(FormatError::FormatNotFound(format.to_string()).into());
    }

    let source = std::fs::read_to_string(path)?;
    let mut provider = RandomPayloads::from_config(&config.random);
    let tree = parse_with(&source, &mut provider, &ParseOptions::from(&config.parser))?;
    Ok(registry.serialize(&tree, format)?)
}

/// Handle the compile command
fn handle_compile_command(
    path: &str,
    format: &str,
    config_path: Option<&String>,
    seed: Option<u64>,
) {
    let output = load_config(config_path, seed)
        .and_then(|config| compile_file(path, format, &config))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    print!("{}", output);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|f| f.description())
            .unwrap_or_default();
        println!("  {}", name);
        println!("    {}", description);
    }
}
