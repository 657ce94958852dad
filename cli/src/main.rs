//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{
    CredentialPool, GenerationGateway, MeetingController, MeetingObserver, NoObserver,
};
use roundtable_domain::Credential;
use roundtable_infrastructure::{ConfigLoader, GeminiGenerator};
use roundtable_presentation::{Cli, ConsoleObserver};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting roundtable");

    // Load and validate configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    config.validate().context("Invalid configuration")?;
    let personas = config.personas()?;

    // === Dependency Injection ===
    // Credentials from config enter the pool ready for rotation
    let pool = CredentialPool::new();
    for (index, secret) in config.generation.credentials.iter().enumerate() {
        pool.add(Credential::usable(format!("credential-{}", index + 1), secret));
    }

    let backend = Arc::new(
        GeminiGenerator::with_endpoint(&config.generation.model, &config.generation.endpoint)
            .context("Failed to build generation backend")?,
    );
    let gateway = Arc::new(GenerationGateway::new(backend, pool));

    let observer: Arc<dyn MeetingObserver> = if cli.quiet {
        Arc::new(NoObserver)
    } else {
        Arc::new(ConsoleObserver::new())
    };
    let turn_delay =
        Duration::from_secs(cli.turn_delay.unwrap_or(config.meeting.turn_delay_seconds));

    let controller = Arc::new(
        MeetingController::new(gateway)
            .with_observer(observer)
            .with_turn_delay(turn_delay)
            .with_agenda_points(config.meeting.agenda_points),
    );

    if !cli.quiet {
        println!();
        println!("Topic: {}", cli.topic);
        println!(
            "Panel: {}",
            personas
                .iter()
                .map(|p| p.name().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Type a line to interject; Ctrl-C to stop.");
    }

    controller.start(&cli.topic, personas)?;

    // Stdin lines become interjections for the next persona turn
    let interject = Arc::clone(&controller);
    let stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            interject.submit_interjection(&line);
        }
    });

    tokio::select! {
        _ = controller.join() => {}
        _ = tokio::signal::ctrl_c() => {
            if !cli.quiet {
                println!("\nStopping meeting...");
            }
            controller.stop().await;
        }
    }
    stdin_task.abort();

    let snapshot = controller.snapshot();
    if let Some(error) = snapshot.last_error {
        bail!(error);
    }
    Ok(())
}
