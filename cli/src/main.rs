//! CLI entrypoint for tax-counsel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{bail, Context, Result};
use clap::Parser;
use counsel_application::{InvokeSpecialistUseCase, OrchestratorRequest, RunOrchestratorUseCase};
use counsel_domain::{ContextBundle, ConversationTurn, SpecialistCall, SpecialistId};
use counsel_infrastructure::{AnthropicConfig, AnthropicGateway, ConfigLoader, FileConfig};
use counsel_presentation::{Cli, NdjsonWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Backpressure bound between the engine and the output writer
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level. Events go to stdout,
    // so logs go to stderr to keep the NDJSON stream clean.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tax-counsel");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let Some(api_key) = config.provider.resolve_api_key() else {
        bail!(
            "No API key found. Set {} or provider.api_key in the config file.",
            config.provider.api_key_env
        );
    };

    let context_bundle = ContextBundle {
        matter_context: read_optional(cli.matter_context.as_ref())?.unwrap_or_default(),
        document_context: read_optional(cli.document_context.as_ref())?.unwrap_or_default(),
    };
    let history = read_history(cli.history.as_ref())?;

    // === Dependency Injection ===
    let registry = Arc::new(config.registry()?);
    let gateway = Arc::new(AnthropicGateway::new(AnthropicConfig {
        api_key,
        base_url: config.provider.base_url.clone(),
        model: config.provider.model.clone(),
        max_tokens: config.provider.max_tokens,
    }));

    // Direct consultation mode: one specialist, no orchestration.
    if let Some(id) = &cli.specialist {
        let specialist = SpecialistId::try_new(id.as_str())?;
        if registry.get(&specialist).is_none() {
            bail!(
                "Unknown specialist '{id}'. Configured: {}",
                registry
                    .iter()
                    .map(|c| c.id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let invoker = InvokeSpecialistUseCase::new(gateway, registry);
        let call = SpecialistCall {
            id: "direct".to_string(),
            specialist,
            question: cli.question,
            client_context: String::new(),
        };
        let answer = invoker.invoke(&call, &context_bundle, &history).await?;

        println!("{answer}");
        if let Some(path) = cli.output {
            std::fs::write(&path, &answer)
                .with_context(|| format!("writing answer to {}", path.display()))?;
        }
        return Ok(());
    }

    let use_case = build_use_case(gateway, registry, &config);

    let request = OrchestratorRequest {
        new_user_text: cli.question,
        context_bundle,
        history,
    };

    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let engine = tokio::spawn(async move { use_case.execute(request, tx).await });

    // Drain the event stream to stdout as it arrives.
    let mut writer = NdjsonWriter::new(tokio::io::stdout());
    while let Some(event) = rx.recv().await {
        writer.write(&event).await?;
    }

    let composed = engine.await.context("orchestration task panicked")??;

    if let Some(path) = cli.output {
        std::fs::write(&path, composed.render())
            .with_context(|| format!("writing composed message to {}", path.display()))?;
        info!(path = %path.display(), "composed message written");
    }

    Ok(())
}

fn build_use_case(
    gateway: Arc<AnthropicGateway>,
    registry: Arc<counsel_domain::SpecialistRegistry>,
    config: &FileConfig,
) -> RunOrchestratorUseCase<AnthropicGateway> {
    let use_case = RunOrchestratorUseCase::new(gateway, registry);
    match &config.orchestrator.persona {
        Some(persona) => use_case.with_persona(persona.as_str()),
        None => use_case,
    }
}

fn read_optional(path: Option<&PathBuf>) -> Result<Option<String>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}

fn read_history(path: Option<&PathBuf>) -> Result<Vec<ConversationTurn>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing history from {}", path.display()))
        }
        None => Ok(Vec::new()),
    }
}
