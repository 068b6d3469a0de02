//! Lobby configuration — themes and timings.
//!
//! The upstream product shipped the same landing funnel roughly twenty times
//! with different copy, colors, and game lists. Here a single [`Theme`]
//! carries everything skin-specific, and [`Timings`] carries every duration
//! the funnel hard-coded, so one sequencer serves every skin.

use std::time::Duration;

use crate::error::ConfigError;
use crate::lobby::{Game, GameKind};

/// Skin-specific copy, game list, reward bounds, and ticker pools.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Display title of the skin (e.g. "FIRE KIRIN").
    pub title: String,
    /// Tagline shown under the title.
    pub tagline: String,
    /// Games a player may pick on the landing form.
    pub games: Vec<Game>,
    /// Inclusive lower bound of the welcome reward draw.
    pub reward_min: u64,
    /// Inclusive upper bound of the welcome reward draw.
    pub reward_max: u64,
    /// Labels of the simulated processing steps, in order.
    pub processing_steps: Vec<String>,
    /// First halves of generated ticker names.
    pub ticker_prefixes: Vec<String>,
    /// Second halves of generated ticker names.
    pub ticker_suffixes: Vec<String>,
    /// Prize strings the ticker cycles through.
    pub ticker_prizes: Vec<String>,
}

impl Theme {
    /// The flagship purple skin.
    pub fn fire_kirin() -> Self {
        Self {
            title: "FIRE KIRIN".into(),
            tagline: "Premium Arcade Hub".into(),
            games: vec![
                Game::new("Fire Kirin", GameKind::Fish),
                Game::new("Game Vault", GameKind::Slots),
                Game::new("Orion Stars", GameKind::Slots),
                Game::new("Vegas Sweeps", GameKind::Slots),
                Game::new("RiverSweeps", GameKind::Slots),
                Game::new("Golden Dragon", GameKind::Fish),
                Game::new("Ultra Monster", GameKind::Fish),
                Game::new("Panda Master", GameKind::Fish),
                Game::new("Vpower", GameKind::Slots),
            ],
            reward_min: 5000,
            reward_max: 5999,
            processing_steps: vec![
                "Establishing Secure Handshake...".into(),
                "Syncing Player Ledger...".into(),
                "Calibrating Engine...".into(),
            ],
            ticker_prefixes: [
                "Dragon", "Lucky", "Fire", "Super", "Mega", "Gold", "Fish", "King", "Master",
                "Slot", "Vegas", "Royal", "Star",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ticker_suffixes: [
                "Slayer", "Winner", "777", "88", "99", "King", "Boy", "Girl", "Pro", "X", "Hunter",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ticker_prizes: [
                "5,000", "MINI POT", "BIG WIN", "12,500", "x500", "JACKPOT", "2,500",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// A smaller-stakes gold skin.
    pub fn golden_dragon() -> Self {
        Self {
            title: "GOLDEN DRAGON".into(),
            tagline: "High Roller Lounge".into(),
            games: vec![
                Game::new("Golden Dragon", GameKind::Fish),
                Game::new("Ocean Dragon", GameKind::Fish),
                Game::new("Milky Way", GameKind::Slots),
                Game::new("Juwa", GameKind::Slots),
                Game::new("Buffalo", GameKind::Slots),
            ],
            reward_min: 5,
            reward_max: 120,
            processing_steps: vec![
                "Connecting to Dragon Servers...".into(),
                "Locating Player Account...".into(),
                "Checking Bonus Eligibility...".into(),
                "Unlocking Reward Vault...".into(),
            ],
            ticker_prefixes: ["Gold", "Dragon", "Jade", "Pearl", "Lotus", "Koi"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ticker_suffixes: ["Emperor", "Queen", "888", "66", "Luck", "Fortune"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ticker_prizes: ["88", "MINI POT", "BIG WIN", "120", "x88", "JACKPOT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Look up a theme by its config name.
    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "fire_kirin" => Ok(Self::fire_kirin()),
            "golden_dragon" => Ok(Self::golden_dragon()),
            other => Err(ConfigError::InvalidValue {
                key: "theme".into(),
                message: format!("unknown theme: {other}"),
            }),
        }
    }

    /// Whether `name` is one of this theme's games.
    pub fn has_game(&self, name: &str) -> bool {
        self.games.iter().any(|g| g.name == name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::fire_kirin()
    }
}

/// Every duration the funnel uses. Defaults match the upstream skins.
#[derive(Debug, Clone)]
pub struct Timings {
    /// Base duration of one processing step.
    pub step_base: Duration,
    /// Maximum jitter added to or subtracted from `step_base` per step.
    pub step_jitter: Duration,
    /// Pause between the last step and the reward summary.
    pub post_steps_pause: Duration,
    /// Total duration of the reward counter animation.
    pub counter_duration: Duration,
    /// Interval between counter display updates.
    pub counter_update: Duration,
    /// Minimum gap between coin sound cues during the counter animation.
    pub coin_gap: Duration,
    /// Length of the cosmetic security scan.
    pub scan_delay: Duration,
    /// Verifying-phase delay when a verification hook was invoked.
    pub verify_with_hook: Duration,
    /// Verifying-phase delay when no hook is registered.
    pub verify_fallback: Duration,
    /// Interval between winner-ticker rotations.
    pub ticker_interval: Duration,
    /// Interval between online-count fluctuations.
    pub online_interval: Duration,
    /// Interval between slots-left decrements.
    pub slots_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            step_base: Duration::from_millis(1500),
            step_jitter: Duration::from_millis(200),
            post_steps_pause: Duration::from_millis(300),
            counter_duration: Duration::from_millis(2500),
            counter_update: Duration::from_millis(16),
            coin_gap: Duration::from_millis(80),
            scan_delay: Duration::from_millis(1500),
            verify_with_hook: Duration::from_millis(4000),
            verify_fallback: Duration::from_millis(1500),
            ticker_interval: Duration::from_millis(4000),
            online_interval: Duration::from_millis(2500),
            slots_interval: Duration::from_millis(4000),
        }
    }
}

impl Timings {
    /// Compressed timings for tests — same shape, milliseconds instead of
    /// seconds.
    pub fn fast() -> Self {
        Self {
            step_base: Duration::from_millis(10),
            step_jitter: Duration::from_millis(2),
            post_steps_pause: Duration::from_millis(2),
            counter_duration: Duration::from_millis(20),
            counter_update: Duration::from_millis(2),
            coin_gap: Duration::from_millis(4),
            scan_delay: Duration::from_millis(10),
            verify_with_hook: Duration::from_millis(20),
            verify_fallback: Duration::from_millis(10),
            ticker_interval: Duration::from_millis(10),
            online_interval: Duration::from_millis(10),
            slots_interval: Duration::from_millis(10),
        }
    }
}

/// Maximum display-name length accepted by the landing form.
pub const MAX_NAME_LEN: usize = 15;

/// Coins granted by the debug chat shortcut.
pub const DEBUG_GRANT_COINS: u64 = 5000;

/// Top-level lobby configuration.
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    pub theme: Theme,
    pub timings: Timings,
    /// Coins a fresh session starts with.
    pub starting_balance: u64,
    /// Seed value of the progressive jackpot display.
    pub starting_jackpot: u64,
    /// Whether the "add coins"/"cheat" chat shortcut is live. Debug
    /// affordance only — ships disabled.
    pub debug_grants: bool,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            timings: Timings::default(),
            starting_balance: 10_000,
            starting_jackpot: 50_000,
            debug_grants: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_have_valid_reward_bounds() {
        for theme in [Theme::fire_kirin(), Theme::golden_dragon()] {
            assert!(theme.reward_min <= theme.reward_max, "{}", theme.title);
            assert!(!theme.games.is_empty());
            assert!(!theme.processing_steps.is_empty());
            assert!(!theme.ticker_prefixes.is_empty());
            assert!(!theme.ticker_suffixes.is_empty());
            assert!(!theme.ticker_prizes.is_empty());
        }
    }

    #[test]
    fn theme_lookup() {
        assert!(Theme::by_name("fire_kirin").is_ok());
        assert!(Theme::by_name("golden_dragon").is_ok());
        assert!(Theme::by_name("neon_panda").is_err());
    }

    #[test]
    fn has_game_matches_exact_names() {
        let theme = Theme::fire_kirin();
        assert!(theme.has_game("Fire Kirin"));
        assert!(!theme.has_game("fire kirin"));
        assert!(!theme.has_game("Blackjack"));
    }

    #[test]
    fn default_config() {
        let config = LobbyConfig::default();
        assert_eq!(config.starting_balance, 10_000);
        assert_eq!(config.starting_jackpot, 50_000);
        assert!(!config.debug_grants);
    }
}
