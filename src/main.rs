use std::sync::Arc;

use ongames::assistant::{GeminiProvider, LlmProvider, PitBoss, PitBossConfig};
use ongames::config::{LobbyConfig, Theme};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let model = std::env::var("ONGAMES_MODEL").unwrap_or_else(|_| "gemini-pro".to_string());
    let theme_name = std::env::var("ONGAMES_THEME").unwrap_or_else(|_| "fire_kirin".to_string());
    let debug_grants = std::env::var("ONGAMES_DEBUG_GRANTS")
        .map(|v| v == "1")
        .unwrap_or(false);

    let theme = Theme::by_name(&theme_name)?;

    // The Pit Boss runs on canned replies when no key is set.
    let provider: Option<Arc<dyn LlmProvider>> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => Some(Arc::new(GeminiProvider::new(
            secrecy::SecretString::from(key),
            model.clone(),
        ))),
        _ => None,
    };

    eprintln!("🎰 ONGAMES v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Theme: {}", theme.title);
    match &provider {
        Some(_) => eprintln!("   Pit Boss: online ({model})"),
        None => eprintln!("   Pit Boss: offline (canned replies; set GEMINI_API_KEY)"),
    }
    if debug_grants {
        eprintln!("   Debug grants: ENABLED");
    }
    eprintln!();

    let config = LobbyConfig {
        theme,
        debug_grants,
        ..LobbyConfig::default()
    };
    let pit_boss = PitBoss::new(provider, PitBossConfig::default());

    ongames::terminal::run(config, pit_boss).await?;
    Ok(())
}
