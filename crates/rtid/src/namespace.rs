//! Well-known namespace names.
//!
//! These are conveniences for callers. Any other non-empty, delimiter-free
//! string is an equally valid namespace.

/// Objects defined in the document being edited.
pub const CURRENT_LEVEL: &str = "CurrentLevel";
/// Stock level modules (sun droppers, mowers, seed banks).
pub const LEVEL_MODULES: &str = "LevelModules";
/// Stock zombie types.
pub const ZOMBIE_TYPES: &str = "ZombieTypes";
/// Stock grid items and obstacles.
pub const GRID_ITEM_TYPES: &str = "GridItemTypes";
/// Stock property sheets.
pub const PROPERTY_SHEETS: &str = "PropertySheets";

/// Namespace used when none is given.
pub const DEFAULT: &str = CURRENT_LEVEL;
