//! Lobby — the game catalog and the post-onboarding player session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assistant::{ChatMessage, PitBoss};
use crate::config::{DEBUG_GRANT_COINS, LobbyConfig};
use crate::player::PlayerIdentity;

/// What kind of cabinet a game is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Fish,
    Slots,
}

impl GameKind {
    /// Label shown under the game tile.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fish => "Fish Hunter",
            Self::Slots => "Slots",
        }
    }
}

/// One entry of a theme's game catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    pub kind: GameKind,
}

impl Game {
    pub fn new(name: impl Into<String>, kind: GameKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Thousands-separated coin rendering ("1234567" → "1,234,567").
pub fn format_coins(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A player's lobby session, created from the sequencer's completion and
/// discarded on exit. Nothing here persists.
pub struct LobbySession {
    id: Uuid,
    player: PlayerIdentity,
    balance: u64,
    jackpot: u64,
    transcript: Vec<ChatMessage>,
    debug_grants: bool,
    started_at: DateTime<Utc>,
}

impl LobbySession {
    /// Open a session for a player who cleared onboarding. Seeds the chat
    /// transcript with the Pit Boss greeting.
    pub fn new(player: PlayerIdentity, config: &LobbyConfig) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            player,
            balance: config.starting_balance,
            jackpot: config.starting_jackpot,
            transcript: Vec::new(),
            debug_grants: config.debug_grants,
            started_at: Utc::now(),
        };
        let greeting = session.greeting();
        session.transcript.push(ChatMessage::assistant(greeting));
        session
    }

    /// The Pit Boss welcome line.
    pub fn greeting(&self) -> String {
        format!(
            "Welcome to {} on ONGAMES PLATFORM, {}! I'm the Boss here. Need chips? Just ask!",
            self.player.chosen_game(),
            self.player.display_name()
        )
    }

    /// Send a chat line and get the reply.
    ///
    /// The "add coins"/"cheat" keywords are a debug affordance, dead unless
    /// `debug_grants` was switched on; everything else goes to the Pit
    /// Boss, which never fails.
    pub async fn chat(&mut self, pit_boss: &PitBoss, input: &str) -> String {
        let history = self.transcript.clone();
        self.transcript.push(ChatMessage::user(input));

        let reply = if self.debug_grants && is_debug_grant(input) {
            self.credit(DEBUG_GRANT_COINS);
            tracing::warn!(
                amount = DEBUG_GRANT_COINS,
                balance = self.balance,
                "debug coin grant triggered via chat keyword"
            );
            format!(
                "[debug] Stimulus package applied: +{} coins. Balance: {}.",
                format_coins(DEBUG_GRANT_COINS),
                format_coins(self.balance)
            )
        } else {
            pit_boss.respond(&history, input, self.balance).await
        };

        self.transcript.push(ChatMessage::assistant(reply.clone()));
        reply
    }

    pub fn credit(&mut self, coins: u64) {
        self.balance = self.balance.saturating_add(coins);
    }

    pub fn debit(&mut self, coins: u64) {
        self.balance = self.balance.saturating_sub(coins);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player(&self) -> &PlayerIdentity {
        &self.player
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn jackpot(&self) -> u64 {
        self.jackpot
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

fn is_debug_grant(input: &str) -> bool {
    let lower = input.to_lowercase();
    lower.contains("add coins") || lower.contains("cheat")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::PitBossConfig;
    use crate::config::Theme;

    fn test_session(debug_grants: bool) -> LobbySession {
        let config = LobbyConfig {
            debug_grants,
            ..LobbyConfig::default()
        };
        let player = PlayerIdentity::new("LUCKY99", "Fire Kirin", &Theme::fire_kirin()).unwrap();
        LobbySession::new(player, &config)
    }

    #[test]
    fn format_coins_groups_thousands() {
        assert_eq!(format_coins(0), "0");
        assert_eq!(format_coins(999), "999");
        assert_eq!(format_coins(1000), "1,000");
        assert_eq!(format_coins(50_000), "50,000");
        assert_eq!(format_coins(1_234_567), "1,234,567");
    }

    #[test]
    fn session_seeds_greeting() {
        let session = test_session(false);
        assert_eq!(session.balance(), 10_000);
        assert_eq!(session.jackpot(), 50_000);
        assert_eq!(session.transcript().len(), 1);
        let greeting = &session.transcript()[0].content;
        assert!(greeting.contains("LUCKY99"));
        assert!(greeting.contains("Fire Kirin"));
    }

    #[test]
    fn balance_arithmetic_saturates() {
        let mut session = test_session(false);
        session.debit(u64::MAX);
        assert_eq!(session.balance(), 0);
        session.credit(500);
        assert_eq!(session.balance(), 500);
    }

    #[tokio::test]
    async fn chat_records_transcript() {
        let mut session = test_session(false);
        let boss = PitBoss::new(None, PitBossConfig::default());
        let reply = session.chat(&boss, "how am I doing?").await;
        assert!(!reply.is_empty());
        // Greeting + user line + reply.
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[1].content, "how am I doing?");
    }

    #[tokio::test]
    async fn debug_grant_requires_flag() {
        let boss = PitBoss::new(None, PitBossConfig::default());

        let mut locked = test_session(false);
        let reply = locked.chat(&boss, "add coins please").await;
        assert_eq!(locked.balance(), 10_000);
        assert!(!reply.starts_with("[debug]"));

        let mut unlocked = test_session(true);
        let reply = unlocked.chat(&boss, "add coins please").await;
        assert_eq!(unlocked.balance(), 10_000 + DEBUG_GRANT_COINS);
        assert!(reply.starts_with("[debug]"), "reply was: {reply}");
    }

    #[tokio::test]
    async fn cheat_keyword_is_case_insensitive() {
        let boss = PitBoss::new(None, PitBossConfig::default());
        let mut session = test_session(true);
        session.chat(&boss, "CHEAT").await;
        assert_eq!(session.balance(), 10_000 + DEBUG_GRANT_COINS);
    }
}
