//*** START FILE: src/main.rs ***//
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use humanizer::config::{self, Config, DEFAULT_CONFIG_FILE};
use humanizer::error::{CliError, GenerationError};
use humanizer::generation::{GeminiGenerator, Generator};
use humanizer::rewriting::{chunk_text, join_outputs};
use humanizer::Humanizer;

#[derive(Parser, Debug)]
#[command(name = "humanizer", version, about = "Rewrites machine-generated prose to read less uniformly")]
struct Cli {
    /// TOML configuration file. Defaults to ./humanizer.toml when it exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate, post-process and reconcile the input text.
    Humanize(HumanizeArgs),
    /// Run only the local passes, without the generator.
    Postprocess(PostprocessArgs),
    /// Print the chunks the input would be split into.
    Chunk(ChunkArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct HumanizeArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Seed for reproducible noise.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the full result as JSON instead of the text alone.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct PostprocessArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ChunkArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Overrides `[chunking] max_words`.
    #[arg(long)]
    max_words: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("humanizer=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Humanize(args) => {
            let text = read_input(&args.input.input)?;
            let generator = GeminiGenerator::from_config(&config.generator)?;
            let humanizer = Humanizer::from_config(&config, Box::new(generator))?;
            let mut rng = make_rng(args.seed);
            let result = humanizer.humanize(&text, &mut rng)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.text);
            }
        }
        Commands::Postprocess(args) => {
            let text = read_input(&args.input.input)?;
            let humanizer = Humanizer::from_config(&config, offline_generator())?;
            let mut rng = make_rng(args.seed);
            println!("{}", humanizer.postprocess_only(&text, &mut rng)?);
        }
        Commands::Chunk(args) => {
            let text = read_input(&args.input.input)?;
            let max_words = args.max_words.unwrap_or(config.chunking.max_words);
            let chunks = chunk_text(&text, max_words);
            info!(chunks = chunks.len(), max_words, "chunked input");
            let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
            println!("{}", join_outputs(&texts));
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let config = match path {
        Some(path) => config::load_config_from_file(path)?,
        None => config::load_config_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    Ok(config)
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let io_error = |source| CliError::Io { path: path.to_path_buf(), source };
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(io_error)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// `postprocess` never calls the generator.
fn offline_generator() -> Box<dyn Generator> {
    Box::new(|_: &str| -> Result<String, GenerationError> {
        Err(GenerationError::MalformedResponse("no generator in offline mode".to_string()))
    })
}

//*** END FILE: src/main.rs ***//
