//! Runtime wiring: store, tools, provider and the query agent.

use std::sync::Arc;

use vagent::{LoopOutcome, QueryAgent};
use vobserve::{SafeLoopHooks, SafeProviderHooks, SafeToolHooks, TracingObservabilityHooks};
use vprovider::ModelProvider;
use vreport::{QueryRecord, substitute};
use vstore::{SqliteMonitoringStore, StoreError, register_monitoring_tools};
use vtooling::{DefaultToolRuntime, ToolRegistry, ToolRuntime};

use crate::providers::{ProviderBuildConfig, build_provider_with_config};
use crate::{StoreSection, VigilConfig, VigilError};

pub struct RuntimeBundle {
    pub store: Arc<SqliteMonitoringStore>,
    pub tools: Arc<DefaultToolRuntime>,
    pub agent: QueryAgent,
}

pub fn open_store(section: &StoreSection) -> Result<Arc<SqliteMonitoringStore>, StoreError> {
    let store = match &section.path {
        Some(path) => SqliteMonitoringStore::new(path)?,
        None => SqliteMonitoringStore::new_in_memory()?,
    };

    if section.seed_demo_data && store.seed_demo_data()? {
        tracing::info!(phase = "store", event = "demo_data_seeded");
    }
    Ok(Arc::new(store))
}

/// Tool runtime over the six monitoring tools with tracing hooks attached.
pub fn monitoring_tool_runtime(store: Arc<SqliteMonitoringStore>) -> Arc<DefaultToolRuntime> {
    let mut registry = ToolRegistry::new();
    register_monitoring_tools(&mut registry, store);

    Arc::new(
        DefaultToolRuntime::new(Arc::new(registry))
            .with_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks))),
    )
}

pub fn build_runtime(config: &VigilConfig) -> Result<RuntimeBundle, VigilError> {
    let provider = build_provider_with_config(ProviderBuildConfig::from(&config.provider))?;
    build_runtime_with_provider(config, provider)
}

pub fn build_runtime_with_provider(
    config: &VigilConfig,
    provider: Arc<dyn ModelProvider>,
) -> Result<RuntimeBundle, VigilError> {
    let store = open_store(&config.store)?;
    let tools = monitoring_tool_runtime(Arc::clone(&store));

    let agent = QueryAgent::builder(provider, Arc::clone(&tools) as Arc<dyn ToolRuntime>)
        .policy(config.agent_policy())
        .hooks(Arc::new(SafeLoopHooks::new(TracingObservabilityHooks)))
        .provider_hooks(Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)))
        .build()?;

    Ok(RuntimeBundle {
        store,
        tools,
        agent,
    })
}

/// A report body with one placeholder per record, in collection order.
pub fn report_template(records: &[QueryRecord]) -> String {
    if records.is_empty() {
        return "No query results.".to_string();
    }

    records
        .iter()
        .map(|record| format!("[{}]", record.query_id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_report(outcome: &LoopOutcome) -> String {
    substitute(&outcome.records, &report_template(&outcome.records))
}
