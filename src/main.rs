//! QuickList demo
//!
//! Seeds an in-memory catalog, runs the archived-lessons listing through the
//! pagination engine and the incremental list controller, then shows a
//! restore followed by the full refresh the mutation workflow requires.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use quicklist::{
    default_config_path, init_tracing, AppConfig, ControllerConfig, FetchOutcome, FilterSet,
    Lesson, ListController, ListEndpoint, ListEngine, MemoryStore, PageRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("QUICKLIST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(config) => {
            init_tracing(&config);
            info!("Configuration loaded from {}", config_path.display());
            config
        }
        Err(e) => {
            let config = AppConfig::default();
            init_tracing(&config);
            error!("Failed to load config: {}. Using defaults.", e);
            config
        }
    };

    // ── Seed the catalog ───────────────────────────────────────
    let store = Arc::new(MemoryStore::new());
    for id in 1..=23u64 {
        let course = if id % 2 == 0 { "Rust Basics" } else { "Advanced Rust" };
        let mut lesson = Lesson::new(id, format!("Lesson {id:02}"), course);
        if id % 3 == 0 {
            lesson.archive("admin@example.com");
        }
        store.insert(lesson);
    }
    info!(lessons = store.len(), "catalog seeded");

    let engine = Arc::new(ListEngine::new(store.clone()));

    // ── One raw engine call, the way an HTTP handler would use it ──
    let archived_base = FilterSet::new().with("archived", true);
    let first_page = engine
        .paginate::<Lesson>(
            &PageRequest::new(1, config.listing.page_size),
            &archived_base,
            &[],
        )
        .await?;
    info!(
        total = first_page.total,
        total_pages = first_page.total_pages,
        "archived lessons, page 1:\n{}",
        serde_json::to_string_pretty(&first_page)?
    );

    // ── The same listing through the scroll controller ─────────
    let endpoint = ListEndpoint::new(engine, archived_base, vec![]);
    let controller = ListController::with_config(
        endpoint,
        ControllerConfig {
            page_size: 5,
            debounce: Duration::from_millis(config.listing.debounce_ms),
        },
    );

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(?event, "list event");
        }
    });

    while let FetchOutcome::Applied { .. } = controller.fetch_next().await {
        info!(accumulated = controller.accumulated().await.len(), "scrolled");
    }

    // Debounced search: only the settled value fetches.
    tokio::join!(
        controller.set_query("lesson 0"),
        controller.set_query("lesson 09"),
    );
    info!(
        matches = controller.accumulated().await.len(),
        "search settled on \"lesson 09\""
    );

    // Restore one lesson, then refresh so totals come from the server again.
    store.update_with(&9, |lesson| lesson.restore("admin@example.com"))?;
    controller.set_query("").await;
    controller.refresh().await;
    info!(
        archived_remaining = controller.accumulated().await.len(),
        "after restore and refresh"
    );

    Ok(())
}
