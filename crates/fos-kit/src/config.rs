//! Kit Configuration

use fos_css::properties::DEFAULT_FONT_SIZE_PX;

/// Toolkit configuration options
#[derive(Debug, Clone)]
pub struct KitConfig {
    /// Fail `on`/`once` when the targets resolve to nothing
    pub strict_targets: bool,

    /// Root font size (px) when the computed value can't be read
    pub root_font_size_fallback: f64,
}

impl KitConfig {
    /// Empty target sets are errors
    pub fn strict() -> Self {
        Self::default().with_strict_targets(true)
    }

    /// Empty target sets are silent no-ops
    pub fn lenient() -> Self {
        Self::default().with_strict_targets(false)
    }

    pub fn with_strict_targets(mut self, strict: bool) -> Self {
        self.strict_targets = strict;
        self
    }

    pub fn with_root_font_size_fallback(mut self, px: f64) -> Self {
        self.root_font_size_fallback = px;
        self
    }
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            strict_targets: cfg!(debug_assertions),
            root_font_size_fallback: DEFAULT_FONT_SIZE_PX,
        }
    }
}
