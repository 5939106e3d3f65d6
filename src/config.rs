//! Picker configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::selection::DEFAULT_NEAR_END_THRESHOLD;
use crate::theme::{parse_color, TableStyle, Theme};

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Picker configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Rows shown at once, also the PageUp/PageDown step
    pub page_size: usize,
    /// Rows from the end at which the selection counts as near the end
    pub near_end_threshold: usize,
    /// Spaces on each side of a cell
    pub cell_padding: usize,
    /// Cap for automatically sized columns
    pub max_column_width: usize,
    pub theme: ThemeConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        let style = TableStyle::default();
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            near_end_threshold: DEFAULT_NEAR_END_THRESHOLD,
            cell_padding: style.cell_padding,
            max_column_width: style.max_column_width,
            theme: ThemeConfig::default(),
        }
    }
}

/// Color names for the `[theme]` table
///
/// Each entry takes `#rrggbb`, a palette name, or `none` for the
/// terminal default. Unset entries keep the built-in theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub selection_bg: Option<String>,
    pub selection_fg: Option<String>,
    pub border: Option<String>,
    pub header: Option<String>,
    pub help: Option<String>,
    pub header_bold: Option<bool>,
    /// Start from the colorless theme instead of the default one
    pub plain: bool,
}

impl ThemeConfig {
    /// Build a `Theme`, falling back per entry on unknown colors
    pub fn to_theme(&self) -> Theme {
        let mut theme = if self.plain {
            Theme::plain()
        } else {
            Theme::default()
        };

        let entries = [
            ("selection_bg", &self.selection_bg, &mut theme.selection_bg),
            ("selection_fg", &self.selection_fg, &mut theme.selection_fg),
            ("border", &self.border, &mut theme.border),
            ("header", &self.header, &mut theme.header),
            ("help", &self.help, &mut theme.help),
        ];
        for (key, name, slot) in entries {
            let Some(name) = name else { continue };
            if name.eq_ignore_ascii_case("none") {
                *slot = None;
                continue;
            }
            match parse_color(name) {
                Some(color) => *slot = Some(color),
                None => tracing::warn!("unknown color {:?} for theme.{}, keeping default", name, key),
            }
        }

        if let Some(bold) = self.header_bold {
            theme.header_bold = bold;
        }
        theme
    }
}

impl PickerConfig {
    /// Load picker config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("picker config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!(
            page_size = config.page_size,
            "loaded picker config from {}",
            path.display()
        );

        Ok(config)
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: PickerConfig = toml::from_str(content)?;
        if config.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        Ok(config)
    }

    pub fn style(&self) -> TableStyle {
        TableStyle {
            cell_padding: self.cell_padding,
            max_column_width: self.max_column_width,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme.to_theme()
    }
}
