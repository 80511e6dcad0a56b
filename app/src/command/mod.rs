//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is its own strategy type with its own input, dispatched
//! statically from `main`.

use menubot_config::Config;
use menubot_conversation::Gateway;
use menubot_dialog::{DialogEngine, FsResources, Messenger, Registry, Templates};
use menubot_providers::OpenAIProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

mod console;
mod init;
mod telegram;
mod version;

pub use console::{ConsoleInput, ConsoleStrategy};
pub use init::InitStrategy;
pub use telegram::{TelegramInput, TelegramStrategy};
pub use version::VersionStrategy;

/// Everything the engine needs apart from a messenger.
struct CommonComponents {
    config: Config,
    gateway: Gateway,
    registry: Arc<Registry>,
    templates: Arc<Templates>,
    resources: FsResources,
}

impl CommonComponents {
    fn into_engine(self, messenger: Arc<dyn Messenger>) -> DialogEngine {
        DialogEngine::new(self.gateway, messenger, self.registry, self.templates)
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    path.map_or_else(Config::load, Config::load_from)
}

/// Build the provider, gateway, registries and templates from config.
///
/// Fails if any template the state machine can reference is missing.
fn init_common_components(config_path: Option<&Path>) -> anyhow::Result<CommonComponents> {
    let config = load_config(config_path)?;

    let openai = &config.providers.openai;
    let mut provider = OpenAIProvider::new(&openai.api_key, openai.proxy.as_deref())?
        .with_model(config.model.name.clone())
        .with_sampling(config.model.max_tokens, config.model.temperature)
        .with_retry_delays(config.model.retry_delays.clone());
    if let Some(base_url) = &openai.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    let gateway = Gateway::new(Arc::new(provider));
    info!("Using model {}", gateway.model());

    let registry = Registry::from_config(&config.personas, &config.topics);
    info!(
        "Registry: {} personas, {} quiz topics",
        registry.personas().len(),
        registry.topics().len()
    );

    let resources = FsResources::new(config.resources.dir.clone());
    info!("Loading resources from {}", resources.root().display());
    let templates = Templates::load(&resources, &registry)?;

    Ok(CommonComponents {
        config,
        gateway,
        registry: Arc::new(registry),
        templates: Arc::new(templates),
        resources,
    })
}

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
