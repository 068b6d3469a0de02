//! Pit Boss — the lobby's chat host.
//!
//! One hard rule: `respond` always returns a reply. Upstream trouble of any
//! kind (no credentials, transport failure, empty completion) is swallowed,
//! logged, and papered over with a canned line that quotes the player's
//! balance. The player never sees an error.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::lobby::format_coins;

/// How many prior messages ride along as context.
pub const HISTORY_WINDOW: usize = 5;

/// Tuning for the Pit Boss's completions.
#[derive(Debug, Clone)]
pub struct PitBossConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for PitBossConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_tokens: 256,
        }
    }
}

/// The chat host. Holds an optional upstream provider; without one it runs
/// entirely on canned replies.
pub struct PitBoss {
    provider: Option<Arc<dyn LlmProvider>>,
    config: PitBossConfig,
}

impl PitBoss {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, config: PitBossConfig) -> Self {
        Self { provider, config }
    }

    /// Whether an upstream model is wired up.
    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    /// Produce a reply to `input`, given the prior transcript and the
    /// player's balance. Infallible by contract.
    pub async fn respond(&self, history: &[ChatMessage], input: &str, balance: u64) -> String {
        let Some(provider) = &self.provider else {
            debug!("no assistant credentials configured; using canned reply");
            return fallback_reply(balance);
        };

        let start = history.len().saturating_sub(HISTORY_WINDOW);
        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
        messages.push(ChatMessage::system(system_prompt(balance)));
        messages.extend(history[start..].iter().cloned());
        messages.push(ChatMessage::user(input));

        let request = CompletionRequest::new(messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        match provider.complete(request).await {
            Ok(response) => {
                let reply = response.content.trim();
                if reply.is_empty() {
                    warn!(
                        model = provider.model_name(),
                        "assistant returned an empty reply; using canned reply"
                    );
                    fallback_reply(balance)
                } else {
                    reply.to_string()
                }
            }
            Err(e) => {
                warn!(
                    model = provider.model_name(),
                    error = %e,
                    "assistant call failed; using canned reply"
                );
                fallback_reply(balance)
            }
        }
    }
}

fn system_prompt(balance: u64) -> String {
    format!(
        "You are a friendly casino Pit Boss for an online gaming platform. \
         The player's current balance is {} coins. \
         Be encouraging, fun, and helpful. Keep responses short (1-2 sentences max).",
        format_coins(balance)
    )
}

/// A canned reply quoting the balance. Used whenever the upstream is
/// unavailable or misbehaves.
pub fn fallback_reply(balance: u64) -> String {
    let coins = format_coins(balance);
    let pool = [
        format!("Hey! Your balance is {coins} coins. Keep playing to win big!"),
        format!("Looking good with {coins} coins! Want some tips?"),
        format!("I see you have {coins} coins. That's a solid stack!"),
        format!("Balance: {coins} coins. Ready to hit the jackpot?"),
    ];
    pool.choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| format!("Your balance is {coins} coins."))
}
