use mapty_core::config::Config;
use mapty_core::headless::{TracingMap, TracingRenderer};
use mapty_core::location::{FixedLocation, LocationService};
use mapty_core::session::{FeedEvent, Session};
use mapty_core::store::{FileStorage, WorkoutStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapty_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    };

    let storage = FileStorage::new(&config.data_dir);
    let store = WorkoutStore::new(storage, config.storage_key.clone());
    let location = LocationService::new(FixedLocation(config.position), config.position_timeout);

    tracing::info!(
        "Workouts stored in {} under '{}'",
        config.data_dir.display(),
        config.storage_key
    );

    let (session, events) = Session::new(
        config,
        store,
        TracingMap::default(),
        TracingRenderer,
        location,
    );

    // Feed UI events from stdin, one JSON object per line. EOF ends the session.
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::error!("Failed to read event feed: {}", err);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match FeedEvent::parse(&line) {
                Ok(event) => {
                    if events.send(event.into()).is_err() {
                        break;
                    }
                }
                Err(err) => tracing::warn!("Skipping malformed event '{}': {}", line, err),
            }
        }
    });

    session.run().await;
}
