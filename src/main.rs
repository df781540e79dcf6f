//! Space Concierge HTTP server.

use std::sync::Arc;

use space_concierge::adapters::ai::{AnthropicConfig, AnthropicProvider, OpenAIConfig, OpenAIProvider};
use space_concierge::adapters::storage::{InMemoryKeyValueStore, RedisKeyValueStore};
use space_concierge::adapters::{app_router, ChatHandlers};
use space_concierge::config::{AiConfig, AiProvider, AppConfig, StorageBackend, StorageConfig};
use space_concierge::ports::{AIProvider, KeyValueStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

fn build_ai_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, BoxError> {
    let missing = |name: &'static str| format!("{} is not configured", name);

    match config.primary_provider {
        AiProvider::OpenAI => {
            let key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| missing("OPENAI_API_KEY"))?;
            let mut provider_config = OpenAIConfig::new(key).with_timeout(config.timeout());
            if let Some(model) = &config.openai_model {
                provider_config = provider_config.with_model(model.clone());
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url.clone());
            }
            Ok(Arc::new(OpenAIProvider::new(provider_config)?))
        }
        AiProvider::Anthropic => {
            let key = config
                .anthropic_api_key
                .clone()
                .ok_or_else(|| missing("ANTHROPIC_API_KEY"))?;
            let mut provider_config = AnthropicConfig::new(key).with_timeout(config.timeout());
            if let Some(model) = &config.anthropic_model {
                provider_config = provider_config.with_model(model.clone());
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url.clone());
            }
            Ok(Arc::new(AnthropicProvider::new(provider_config)?))
        }
    }
}

async fn build_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, BoxError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; sessions and spaces are lost on restart");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
        StorageBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            let mut store = RedisKeyValueStore::connect(url).await?;
            if let Some(namespace) = &config.namespace {
                store = store.with_namespace(namespace.clone());
            }
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_logging(&config);
    config.validate()?;

    let ai_provider = build_ai_provider(&config.ai)?;
    let info = ai_provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "text-completion gateway ready");

    let store = build_store(&config.storage).await?;
    tracing::info!(backend = ?config.storage.backend, "key-value store ready");

    let app = app_router(ChatHandlers::from_ports(ai_provider, store), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "space-concierge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("space-concierge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
}
