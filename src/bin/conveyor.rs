//! conveyor CLI — intake API, worker loop, and operator commands.

use clap::{Parser, Subcommand};
use conveyor_rs::broker::Broker;
use conveyor_rs::config::Config;
use conveyor_rs::counter::CounterStore;
use conveyor_rs::dispatch::Dispatcher;
use conveyor_rs::http::{self, AppState};
use conveyor_rs::stats::StatsAggregator;
use conveyor_rs::telemetry::{TelemetryConfig, init_telemetry};
use conveyor_rs::worker::{SimulatedHandler, Worker, WorkerConfig};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "conveyor", about = "Durable task pipeline over pgmq and Valkey")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP intake API
    Api {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run the consumer loop
    Worker {
        /// Visibility timeout (seconds) for queue reads
        #[arg(long, default_value_t = 30)]
        visibility_timeout: i32,
        /// Simulated workload duration in milliseconds
        #[arg(long, default_value_t = 1000)]
        workload_ms: u64,
    },
    /// Submit a task from the command line
    Submit {
        /// JSON task payload
        json: String,
    },
    /// Print a stats snapshot
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Api { host, port } => cmd_api(host, port).await,
        Command::Worker {
            visibility_timeout,
            workload_ms,
        } => cmd_worker(visibility_timeout, workload_ms).await,
        Command::Submit { json } => cmd_submit(json).await,
        Command::Stats => cmd_stats().await,
    }
}

async fn cmd_api(host: String, port: u16) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: config.service_name.clone(),
        deployment_environment: config.deployment_environment.clone(),
    })?;

    let broker = Arc::new(Broker::connect(config.broker_url.expose_secret()).await?);
    broker.ensure_queue(&config.queue_name).await?;
    let counter = CounterStore::connect(
        config.valkey_url.expose_secret(),
        &config.processed_count_key,
    )
    .await?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&broker), &config.queue_name));
    let stats = Arc::new(StatsAggregator::new(
        Arc::clone(&broker),
        counter,
        &config.queue_name,
    ));

    http::serve(
        &host,
        port,
        AppState {
            dispatcher,
            stats,
            broker,
        },
    )
    .await?;
    Ok(())
}

async fn cmd_worker(visibility_timeout: i32, workload_ms: u64) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: format!("{}-worker", config.service_name),
        deployment_environment: config.deployment_environment.clone(),
    })?;

    let broker = Arc::new(Broker::connect(config.broker_url.expose_secret()).await?);
    let counter = CounterStore::connect(
        config.valkey_url.expose_secret(),
        &config.processed_count_key,
    )
    .await?;

    let worker = Worker::new(
        broker,
        counter,
        Arc::new(SimulatedHandler {
            duration: Duration::from_millis(workload_ms),
        }),
        &config.queue_name,
        WorkerConfig {
            visibility_timeout,
            ..WorkerConfig::default()
        },
    );

    let shutdown = worker.shutdown_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        shutdown.notify_one();
    });

    worker.run().await?;
    Ok(())
}

async fn cmd_submit(json: String) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let task: serde_json::Value = serde_json::from_str(&json)?;

    let broker = Arc::new(Broker::connect(config.broker_url.expose_secret()).await?);
    let dispatcher = Dispatcher::new(broker, &config.queue_name);

    let ack = dispatcher.enqueue(task).await?;
    println!("Queued: task {} (msg {})", ack.task_id, ack.msg_id);
    Ok(())
}

async fn cmd_stats() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let broker = Arc::new(Broker::connect(config.broker_url.expose_secret()).await?);
    let counter = CounterStore::connect(
        config.valkey_url.expose_secret(),
        &config.processed_count_key,
    )
    .await?;
    let stats = StatsAggregator::new(broker, counter, &config.queue_name);

    let snapshot = stats.snapshot().await?;
    println!("Queue backlog:    {}", snapshot.queue_depth);
    println!("Processed count:  {}", snapshot.processed_count);
    println!("Valkey keys:      {}", snapshot.key_count);
    Ok(())
}
