//! seqbench - times the linked list against the vector on endpoint operations

use {
    clap::Parser,
    sequences::bench::{self, BenchConfig},
    tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser, Debug)]
#[command(name = "seqbench")]
#[command(about = "Compare SequenceList and SequenceVector on append, prepend and erase")]
struct Args {
    /// Rounds per build-and-drop loop, and elements per erase loop
    #[arg(env = "SEQBENCH_REPEAT", default_value_t = 10_000)]
    repeat: usize,

    /// String stored in every element
    #[arg(long, env = "SEQBENCH_PAYLOAD", default_value = "TODO")]
    payload: String,

    /// Log level
    #[arg(long, env = "SEQBENCH_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        BenchConfig {
            repeat: args.repeat,
            payload: args.payload,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BenchConfig::from(args);
    let report = bench::run(&config)?;
    print!("{}", report);

    tracing::info!("benchmark finished");
    Ok(())
}
