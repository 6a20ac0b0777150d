//! Cosmetic Customization
//!
//! Skins and themes with level-gated unlocks. Selection of an
//! unowned entry is a no-op; unlocks derive from the account level.

use serde::{Deserialize, Serialize};

/// Static skin definition.
#[derive(Clone, Copy, Debug)]
pub struct SkinDef {
    /// Stable id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Glyph the renderer draws along the curve.
    pub emoji: &'static str,
    /// Account level that unlocks this skin.
    pub unlock_level: u32,
}

/// Static theme definition.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDef {
    /// Stable id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Primary accent color.
    pub primary: &'static str,
    /// Secondary accent color.
    pub secondary: &'static str,
    /// Account level that unlocks this theme.
    pub unlock_level: u32,
}

/// The fixed skin table.
pub const SKINS: &[SkinDef] = &[
    SkinDef { id: "ufo", name: "UFO", emoji: "\u{1F6F8}", unlock_level: 1 },
    SkinDef { id: "rocket", name: "Rocket", emoji: "\u{1F680}", unlock_level: 3 },
    SkinDef { id: "comet", name: "Comet", emoji: "\u{2604}\u{FE0F}", unlock_level: 5 },
    SkinDef { id: "dragon", name: "Dragon", emoji: "\u{1F409}", unlock_level: 8 },
    SkinDef { id: "phoenix", name: "Phoenix", emoji: "\u{1F525}", unlock_level: 12 },
];

/// The fixed theme table.
pub const THEMES: &[ThemeDef] = &[
    ThemeDef { id: "neon", name: "Neon", primary: "#a855f7", secondary: "#3b82f6", unlock_level: 1 },
    ThemeDef { id: "sunset", name: "Sunset", primary: "#f97316", secondary: "#ec4899", unlock_level: 4 },
    ThemeDef { id: "ocean", name: "Ocean", primary: "#06b6d4", secondary: "#0ea5e9", unlock_level: 7 },
    ThemeDef { id: "matrix", name: "Matrix", primary: "#22c55e", secondary: "#84cc16", unlock_level: 10 },
];

/// Look up a skin by id.
pub fn skin(id: &str) -> Option<&'static SkinDef> {
    SKINS.iter().find(|s| s.id == id)
}

/// Look up a theme by id.
pub fn theme(id: &str) -> Option<&'static ThemeDef> {
    THEMES.iter().find(|t| t.id == id)
}

/// Player cosmetic selections and unlocks, persisted as one blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customization {
    /// Currently selected skin id.
    pub selected_skin: String,
    /// Currently selected theme id.
    pub selected_theme: String,
    /// Unlocked skin ids.
    pub unlocked_skins: Vec<String>,
    /// Unlocked theme ids.
    pub unlocked_themes: Vec<String>,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            selected_skin: "ufo".to_string(),
            selected_theme: "neon".to_string(),
            unlocked_skins: vec!["ufo".to_string()],
            unlocked_themes: vec!["neon".to_string()],
        }
    }
}

impl Customization {
    /// Select a skin. Returns false (no change) when not unlocked.
    pub fn select_skin(&mut self, id: &str) -> bool {
        if self.unlocked_skins.iter().any(|s| s == id) {
            self.selected_skin = id.to_string();
            true
        } else {
            false
        }
    }

    /// Select a theme. Returns false (no change) when not unlocked.
    pub fn select_theme(&mut self, id: &str) -> bool {
        if self.unlocked_themes.iter().any(|t| t == id) {
            self.selected_theme = id.to_string();
            true
        } else {
            false
        }
    }

    /// Unlock everything the given level allows.
    ///
    /// Returns the display names of newly unlocked cosmetics.
    pub fn sync_with_level(&mut self, level: u32) -> Vec<&'static str> {
        let mut newly = Vec::new();
        for def in SKINS {
            if def.unlock_level <= level && !self.unlocked_skins.iter().any(|s| s == def.id) {
                self.unlocked_skins.push(def.id.to_string());
                newly.push(def.name);
            }
        }
        for def in THEMES {
            if def.unlock_level <= level && !self.unlocked_themes.iter().any(|t| t == def.id) {
                self.unlocked_themes.push(def.id.to_string());
                newly.push(def.name);
            }
        }
        newly
    }

    /// Currently selected skin, falling back to the default.
    pub fn current_skin(&self) -> &'static SkinDef {
        skin(&self.selected_skin).unwrap_or(&SKINS[0])
    }

    /// Currently selected theme, falling back to the default.
    pub fn current_theme(&self) -> &'static ThemeDef {
        theme(&self.selected_theme).unwrap_or(&THEMES[0])
    }
}
