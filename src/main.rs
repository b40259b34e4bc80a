use pawfetch::config::{LoggingSettings, Settings};
use pawfetch::services::DogsClient;
use pawfetch::shell::{Flow, Shell};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so they never interleave with the interactive output
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Using shelter service at {}", settings.api.base_url);

    let client = DogsClient::new(settings.api.base_url.clone(), settings.api.timeout())?;
    let mut shell = Shell::new(Arc::new(client));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Welcome to Pawfetch. Type 'help' for commands.\n")
        .await?;

    loop {
        stdout.write_all(shell.prompt().as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let (flow, output) = shell.handle_line(&line).await;
        stdout.write_all(output.as_bytes()).await?;

        if flow == Flow::Quit {
            break;
        }
    }

    info!("Goodbye");
    Ok(())
}
