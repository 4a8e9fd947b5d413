use std::process::ExitCode;

use todo_host::{Config, TodoSession};
use todo_sync::FetchOutcome;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut session = TodoSession::from_config(&config);
    if session.start().await != FetchOutcome::Applied {
        if let Some(err) = session.view().error {
            tracing::error!(error = %err, url = %config.base_url, "could not load todos");
        }
        return ExitCode::FAILURE;
    }

    let view = session.view();
    for item in &view.visible_items {
        let mark = if item.completed { 'x' } else { ' ' };
        println!("[{mark}] {:>4}  {}", item.id.0, item.text);
    }
    match view.display_range {
        Some(range) => println!(
            "Showing {}-{} of {} todos, page {} of {}",
            range.start, range.end, view.total_count, view.page, view.total_pages
        ),
        None => println!("No todos"),
    }
    ExitCode::SUCCESS
}
