//! Bevy integration for style sheets.
//!
//! Provides:
//! - `StyleSheetPlugin` — builder-pattern plugin that owns the app's sheet
//! - `StylisResource` — the configured CSS transform
//! - `PendingStyles` — generation results waiting to be committed; flushed
//!   into the sheet every `PostUpdate`
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use styled_sheet::bevy::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(StyleSheetPlugin::new().rehydrate_from(SERVER_HTML))
//!         .add_systems(Update, style_buttons)
//!         .run();
//! }
//!
//! fn style_buttons(
//!     sheet: Res<StyleSheet>,
//!     stylis: Res<StylisResource>,
//!     mut pending: ResMut<PendingStyles>,
//!     buttons: Query<&ButtonStyle>,
//! ) {
//!     for button in &buttons {
//!         let class = pending
//!             .generate(&button.style, &button.context, &sheet, &stylis)
//!             .unwrap_or_default();
//!         // hand `class` to the renderer
//!     }
//! }
//! ```

use std::ops::Deref;

use bevy::prelude::*;

use crate::{
    ComponentStyle, ConfigError, EngineConfig, ExecutionContext, InsertionBuffer, SheetOptions, StyleSheet, Stylis,
};

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin that installs a [`StyleSheet`] and commits pending styles.
///
/// ```ignore
/// App::new()
///     .add_plugins(
///         StyleSheetPlugin::new()
///             .with_options(SheetOptions::default().production(true))
///             .rehydrate_from(server_html)
///     )
/// ```
#[derive(Default)]
pub struct StyleSheetPlugin {
    options: SheetOptions,
    stylis: Stylis,
    markup: Option<String>,
}

impl StyleSheetPlugin {
    /// Default options, no transform plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plugin from a loaded [`EngineConfig`].
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            options: config.sheet_options(),
            stylis: config.stylis()?,
            markup: None,
        })
    }

    /// Builder method: set sheet options.
    pub fn with_options(mut self, options: SheetOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method: set the CSS transform.
    pub fn with_stylis(mut self, stylis: Stylis) -> Self {
        self.stylis = stylis;
        self
    }

    /// Rehydrate the sheet from server-rendered markup on startup.
    ///
    /// Default: none
    pub fn rehydrate_from(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }
}

impl Plugin for StyleSheetPlugin {
    fn build(&self, app: &mut App) {
        let mut sheet = StyleSheet::new(self.options.clone());
        if let Some(markup) = &self.markup
            && let Err(err) = sheet.rehydrate_from_markup(markup)
        {
            tracing::error!(%err, "failed to rehydrate style sheet");
        }

        app.insert_resource(sheet);
        app.insert_resource(StylisResource(self.stylis.clone()));
        app.init_resource::<PendingStyles>();
        app.add_systems(PostUpdate, commit_pending_styles);
    }
}

// =============================================================================
// Resources
// =============================================================================

impl Resource for StyleSheet {}

/// The app-wide CSS transform.
#[derive(Resource, Clone, Debug, Default)]
pub struct StylisResource(pub Stylis);

impl Deref for StylisResource {
    type Target = Stylis;

    fn deref(&self) -> &Stylis {
        &self.0
    }
}

/// Rules generated this frame, committed in `PostUpdate`.
#[derive(Resource, Debug, Default)]
pub struct PendingStyles {
    buffer: InsertionBuffer,
}

impl PendingStyles {
    /// Generate class names for `style` and keep its new rules for commit.
    pub fn generate(
        &mut self,
        style: &ComponentStyle,
        context: &ExecutionContext,
        sheet: &StyleSheet,
        stylis: &Stylis,
    ) -> crate::Result<String> {
        let (names, mut buffer) = style.generate_and_insert(context, sheet, stylis)?;
        self.buffer.append(&mut buffer);
        Ok(names)
    }

    /// Queue a buffer produced elsewhere.
    pub fn push(&mut self, mut buffer: InsertionBuffer) {
        self.buffer.append(&mut buffer);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Flush everything queued in [`PendingStyles`] into the [`StyleSheet`].
pub fn commit_pending_styles(mut sheet: ResMut<StyleSheet>, mut pending: ResMut<PendingStyles>) {
    if pending.is_empty() {
        return;
    }
    let count = pending.len();
    match sheet.flush_styles(&mut pending.buffer) {
        Ok(()) => tracing::trace!(count, "committed pending styles"),
        Err(err) => tracing::error!(%err, "failed to commit pending styles"),
    }
}

// =============================================================================
// Tests
// =============================================================================
