//! Startup wiring: one [`Config`] in, a ready [`Coordinator`] and
//! [`Aggregator`] sharing one record store out.

use anyhow::Context;
use chatpulse_core::config::Config;
use chatpulse_core::sinks::{AlertSink, ExportSink};
use chatpulse_core::store::{self, RecordStore};
use chatpulse_core::{Aggregator, Coordinator};
use chatpulse_dashboard::DashboardState;
use chatpulse_feeds::{
    HttpEnricher, JsonlExportSink, LogAlertSink, StaticPrivilegeSource, WebhookAlertSink,
};
use std::sync::Arc;
use std::time::Duration;

const ALERT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

pub struct App {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub coordinator: Arc<Coordinator>,
    pub aggregator: Arc<Aggregator>,
}

impl App {
    /// Open the configured store and build everything that depends on it.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = store::open(&config.storage).with_context(|| {
            format!("opening {:?} record store", config.storage.backend)
        })?;
        Self::with_store(config, store)
    }

    /// Build on an already opened store.
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> anyhow::Result<Self> {
        let coordinator = Arc::new(build_coordinator(&config, Arc::clone(&store))?);
        let aggregator = Arc::new(Aggregator::new(
            Arc::clone(&store),
            config.dashboard.unknown_username.clone(),
        ));
        Ok(Self {
            config,
            store,
            coordinator,
            aggregator,
        })
    }

    pub fn dashboard_state(&self) -> DashboardState {
        DashboardState::new(Arc::clone(&self.aggregator), self.config.dashboard.top_n)
    }
}

fn build_coordinator(config: &Config, store: Arc<dyn RecordStore>) -> anyhow::Result<Coordinator> {
    let privilege = Arc::new(StaticPrivilegeSource::new(
        config.privilege.premium_users.iter().copied(),
    ));

    let alerts: Arc<dyn AlertSink> = match &config.alerts.webhook_url {
        Some(url) => Arc::new(
            WebhookAlertSink::new(url.clone(), ALERT_WEBHOOK_TIMEOUT)
                .context("building alert webhook client")?,
        ),
        None => Arc::new(LogAlertSink),
    };

    let mut coordinator = Coordinator::new(
        store,
        config.classifier.profanity_filter(),
        privilege,
        alerts,
    )
    .with_alert_template(config.alerts.template.clone());

    if let Some(path) = &config.export.path {
        let export: Arc<dyn ExportSink> = Arc::new(
            JsonlExportSink::open(path)
                .with_context(|| format!("opening export file {}", path.display()))?,
        );
        coordinator = coordinator.with_export(export);
    }

    if config.enrichment.enabled {
        if config.enrichment.api_key().is_none() {
            tracing::warn!(
                env = %config.enrichment.api_key_env,
                "enrichment enabled without an api key"
            );
        }
        let enricher = HttpEnricher::from_config(&config.enrichment)
            .context("building enrichment client")?;
        coordinator = coordinator.with_enricher(Arc::new(enricher), config.enrichment.timeout());
    }

    Ok(coordinator)
}
