//! Session identity — who the player claims to be and which game they picked.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_NAME_LEN, Theme};
use crate::error::IdentityError;

/// The identity entered on the landing form.
///
/// Validated once at construction, immutable afterwards — the sequencer
/// carries it untouched from `start()` to the completion callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    display_name: String,
    chosen_game: String,
}

impl PlayerIdentity {
    /// Validate form input against the active theme.
    ///
    /// The name is trimmed; it must be non-empty and at most
    /// [`MAX_NAME_LEN`] characters. The game must be one of the theme's
    /// games.
    pub fn new(display_name: &str, chosen_game: &str, theme: &Theme) -> Result<Self, IdentityError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(IdentityError::NameTooLong { max: MAX_NAME_LEN });
        }
        if !theme.has_game(chosen_game) {
            return Err(IdentityError::UnknownGame {
                game: chosen_game.to_string(),
            });
        }
        Ok(Self {
            display_name: name.to_string(),
            chosen_game: chosen_game.to_string(),
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn chosen_game(&self) -> &str {
        &self.chosen_game
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_identity() {
        let theme = Theme::fire_kirin();
        let id = PlayerIdentity::new("LUCKY99", "Fire Kirin", &theme).unwrap();
        assert_eq!(id.display_name(), "LUCKY99");
        assert_eq!(id.chosen_game(), "Fire Kirin");
    }

    #[test]
    fn trims_whitespace() {
        let theme = Theme::fire_kirin();
        let id = PlayerIdentity::new("  LUCKY99  ", "Fire Kirin", &theme).unwrap();
        assert_eq!(id.display_name(), "LUCKY99");
    }

    #[test]
    fn rejects_empty_name() {
        let theme = Theme::fire_kirin();
        assert!(matches!(
            PlayerIdentity::new("   ", "Fire Kirin", &theme),
            Err(IdentityError::EmptyName)
        ));
    }

    #[test]
    fn rejects_long_name() {
        let theme = Theme::fire_kirin();
        let name = "X".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            PlayerIdentity::new(&name, "Fire Kirin", &theme),
            Err(IdentityError::NameTooLong { .. })
        ));
    }

    #[test]
    fn rejects_unknown_game() {
        let theme = Theme::fire_kirin();
        assert!(matches!(
            PlayerIdentity::new("LUCKY99", "Blackjack", &theme),
            Err(IdentityError::UnknownGame { .. })
        ));
    }
}
