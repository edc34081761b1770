use clap::Parser;
use dsgrn_signatures::dynamics::{MorseDecomposition, MorseGraph};
use dsgrn_signatures::parameter::{Network, ParameterGraph};
use dsgrn_signatures::phase::DomainGraph;
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dsgrn_signature")]
#[command(about = "Compute the Morse graph of one parameter of a regulatory network")]
struct Args {
    /// Path to a network specification file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Parameter index to decode
    #[arg(value_name = "INDEX")]
    index: u64,

    /// Directory holding the precomputed logic factor tables
    #[arg(long, default_value = "resources/logic", require_equals = true)]
    logic: PathBuf,

    /// Emit graphviz instead of the JSON text form
    #[arg(long)]
    graphviz: bool,

    /// Logging verbosity (use -v for info, or -v=LEVEL for specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let specification = std::fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to read network file {}: {}", args.file.display(), e);
        std::process::exit(1);
    });
    let network: Network = specification.parse().unwrap_or_else(|e| {
        eprintln!("Failed to parse network specification: {e}");
        std::process::exit(1);
    });

    let parameter_graph = ParameterGraph::new(network, &args.logic).unwrap_or_else(|e| {
        eprintln!("Failed to load factor tables: {e}");
        std::process::exit(1);
    });
    println!("{parameter_graph}");

    let parameter = parameter_graph.parameter(args.index).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    println!("Parameter: {parameter}");

    let domain_graph = DomainGraph::new(parameter);
    let decomposition = MorseDecomposition::new(domain_graph.digraph());
    let morse_graph = MorseGraph::new(&domain_graph, &decomposition);

    if args.graphviz {
        print!("{}", morse_graph.graphviz());
    } else {
        println!("{}", morse_graph.stringify());
    }
}
