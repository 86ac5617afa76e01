//! Boot — logging init, config load, catalog build, engine assembly.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::EngineConfig;
use crate::event::EventBoundaryResolver;
use crate::filter::{AnnotationFilter, FilterScheduler};
use crate::format::{FormatCatalog, FormatDetector};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Assembled engine components sharing one format catalog.
pub struct Engine {
    pub catalog: Arc<FormatCatalog>,
    pub resolver: EventBoundaryResolver,
    pub scheduler: FilterScheduler,
}

/// Load config, build the format catalog, and wire up the detector,
/// resolver, and filter scheduler.
///
/// `filters` is the composition root's ordered filter list; the scheduler
/// stays closed over it. The heavy-pass drain loop is spawned on the
/// current tokio runtime.
///
/// Returns `(Engine, EngineConfig)` on success.
pub fn boot(
    filters: Vec<Arc<dyn AnnotationFilter>>,
) -> Result<(Engine, EngineConfig), Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    config.validate()?;
    info!(
        "Loaded configuration: {} formats, sampling {} lines",
        config.formats.len(),
        config.detection.sample_lines
    );

    let catalog = Arc::new(FormatCatalog::from_config(&config.formats));
    if catalog.len() < config.formats.len() {
        info!(
            "Format catalog holds {} of {} configured formats",
            catalog.len(),
            config.formats.len()
        );
    }

    let detector = FormatDetector::new(Arc::clone(&catalog), &config.detection);
    let resolver = EventBoundaryResolver::new(detector);

    let scheduler = FilterScheduler::new(filters, config.heavy_pass_enabled);
    scheduler.start();

    Ok((
        Engine {
            catalog,
            resolver,
            scheduler,
        },
        config,
    ))
}
