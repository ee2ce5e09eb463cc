use clap::Parser;
use log_producer::kafka::{self, Dispatcher, KafkaConnector, Router};
use log_producer::probe::wait_ready;
use log_producer::record::{Catalog, Synthesizer};
use log_producer::runner::shutdown_signal;
use log_producer::{Config, Error, Result, RunSummary, Runner};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "log-producer")]
#[command(about = "Synthetic application log producer for Kafka", long_about = None)]
struct Args {
    #[arg(long, help = "Broker host (default: redpanda)")]
    host: Option<String>,

    #[arg(long, help = "Broker port (default: 9092)")]
    port: Option<u16>,

    #[arg(short, long, value_name = "MS", help = "Pause between batches in milliseconds")]
    interval_ms: Option<u64>,

    #[arg(long, help = "Topic prefix (default: logs)")]
    topic_prefix: Option<String>,

    #[arg(long, help = "Seed for reproducible record streams")]
    seed: Option<u64>,

    #[arg(long, help = "Stop after this many batches")]
    max_batches: Option<u64>,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.broker.host = host;
        }
        if let Some(port) = self.port {
            config.broker.port = port;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.producer.interval_ms = interval_ms;
        }
        if let Some(prefix) = self.topic_prefix {
            config.producer.topic_prefix = prefix;
        }
        if self.seed.is_some() {
            config.producer.seed = self.seed;
        }
        if self.max_batches.is_some() {
            config.producer.max_batches = self.max_batches;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting log-producer");

    match run(args).await {
        Ok(summary) => {
            info!(
                batches = summary.batches,
                delivered = summary.delivered,
                dropped = summary.dropped,
                "Producer shut down cleanly"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<RunSummary> {
    let mut config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(Error::Config(e));
        }
    };
    args.apply(&mut config);

    info!(
        broker = %config.bootstrap_servers(),
        topic_prefix = %config.producer.topic_prefix,
        interval_ms = config.producer.interval_ms,
        seed = ?config.producer.seed,
        max_batches = ?config.producer.max_batches,
        "Configuration summary"
    );

    let catalog = Catalog::standard();
    let rng = match config.producer.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let synthesizer = Synthesizer::new(&catalog, rng)?;

    wait_ready(
        &config.broker.host,
        config.broker.port,
        config.probe_settings(),
    )
    .await?;

    let connector = KafkaConnector::from_config(&config);
    let connection = kafka::connect(&connector, config.retry_policy(), config.flush_timeout()).await?;

    let runner = Runner::new(
        connection,
        synthesizer,
        Router::new(config.producer.topic_prefix.clone()),
        Dispatcher::new(config.ack_timeout()),
        config.run_settings(),
    );

    runner.run(shutdown_signal()).await
}

fn init_logging(json: bool, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("log_producer=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("log_producer=info,warn"))
    };

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
