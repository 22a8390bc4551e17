//! # Styled Sheet
//!
//! Deterministic CSS class generation for component styles, with an
//! ordered, deduplicated stylesheet that can be serialized on a server and
//! rehydrated on a client.
//!
//! ## Design
//!
//! ```text
//!   RuleSet ──flatten──▶ css ──hash──▶ class name
//!                          │
//!                          └─stylis──▶ rules ──▶ InsertionBuffer ──flush──▶ StyleSheet
//!                                                                             │
//!                                  get_style_text() / rehydrate() ◀───────────┘
//! ```
//!
//! - **Deterministic**: the same rules, component id and context always give
//!   the same class name, on every run and every machine
//! - **Ordered**: a component's rules sit in the group it registered at
//!   definition time, so render order never changes cascade order
//! - **Pure generation**: [`ComponentStyle::generate_and_insert`] only reads
//!   the sheet; effects are committed by [`StyleSheet::flush_styles`]
//!
//! ```ignore
//! use styled_sheet::{css, ComponentStyle, ExecutionContext, StyleSheet, Stylis};
//!
//! let mut sheet = StyleSheet::default();
//! let stylis = Stylis::new();
//!
//! let button = ComponentStyle::new(
//!     css!("color: ${}; &:hover { opacity: 0.8; }", |ctx| {
//!         ctx.prop_str("color").unwrap_or("black").to_string()
//!     }),
//!     "Button-kGxTp",
//!     None,
//! );
//! button.register(&mut sheet)?;
//!
//! let ctx = ExecutionContext::new().with_prop("color", "tomato");
//! let (class_name, mut pending) = button.generate_and_insert(&ctx, &sheet, &stylis)?;
//! sheet.flush_styles(&mut pending)?;
//! ```

extern crate self as styled_sheet;

pub mod buffer;
pub mod component;
pub mod component_id;
pub mod config;
pub mod error;
pub mod flatten;
pub mod global_style;
pub mod hash;
pub mod keyframes;
pub mod rules;
pub mod server;
pub mod sheet;
pub mod stylis;

#[cfg(feature = "bevy")]
pub mod bevy;

pub use buffer::{InsertionBuffer, PendingRules};
pub use component::ComponentStyle;
pub use component_id::ComponentIdGenerator;
pub use config::{ConfigError, EngineConfig, ServerConfig};
pub use error::{Result, StyleError};
pub use flatten::{add_unit_if_needed, flatten, hyphenate};
pub use global_style::GlobalStyle;
pub use hash::{DJB2_SEED, SEED, generate_alphabetic_name, generate_component_id, hash, phash};
pub use keyframes::Keyframes;
pub use rules::{CssObject, ExecutionContext, Interpolation, RuleSet, StyleFn};
pub use server::ServerStyleSheet;
pub use sheet::{
    GroupIdAllocator, GroupedTag, LiveSheet, LiveTag, MAX_GROUP, ManifestEntry, SheetOptions, StyleSheet, Tag,
    VirtualTag,
};
pub use stylis::{PrefixerPlugin, RtlPlugin, Stylis, StylisOptions, StylisPlugin};
pub use styled_sheet_macro::css;

/// Attribute marking style tags written by this engine.
pub const SC_ATTR: &str = "data-styled";

/// Attribute carrying the engine version on style tags.
pub const SC_ATTR_VERSION: &str = "data-styled-version";

/// Engine version; seeds every hash, so class names change across versions.
pub const SC_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Written after every rule in serialized sheet text.
pub const SPLITTER: &str = "/*!sc*/\n";
