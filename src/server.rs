//! Server rendering. Collect a render's styles and serialize them as
//! `<style>` markup for the client to rehydrate.

use crate::error::{Result, StyleError};
use crate::sheet::{SheetOptions, StyleSheet};
use crate::{SC_ATTR, SC_ATTR_VERSION, SC_VERSION};

/// One server render's stylesheet.
///
/// Create one per request. After [`seal`](Self::seal) the sheet can no
/// longer be read or written.
#[derive(Debug)]
pub struct ServerStyleSheet {
    sheet: StyleSheet,
    sealed: bool,
    nonce: Option<String>,
}

impl Default for ServerStyleSheet {
    fn default() -> Self {
        Self::new(SheetOptions::default())
    }
}

impl ServerStyleSheet {
    pub fn new(options: SheetOptions) -> Self {
        Self {
            sheet: StyleSheet::new(options),
            sealed: false,
            nonce: None,
        }
    }

    /// Builder method: set the CSP nonce written on the style tag.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    #[inline]
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn sheet(&self) -> Result<&StyleSheet> {
        if self.sealed {
            return Err(StyleError::Sealed);
        }
        Ok(&self.sheet)
    }

    /// The sheet to render into.
    pub fn sheet_mut(&mut self) -> Result<&mut StyleSheet> {
        if self.sealed {
            return Err(StyleError::Sealed);
        }
        Ok(&mut self.sheet)
    }

    /// `<style>` markup for everything collected so far; empty when nothing
    /// was rendered.
    pub fn get_style_tags(&self) -> Result<String> {
        let css = self.sheet()?.get_style_text();
        if css.is_empty() {
            return Ok(String::new());
        }

        let mut attrs = Vec::with_capacity(3);
        if let Some(nonce) = &self.nonce {
            attrs.push(format!("nonce=\"{nonce}\""));
        }
        attrs.push(format!("{SC_ATTR}=\"true\""));
        attrs.push(format!("{SC_ATTR_VERSION}=\"{SC_VERSION}\""));

        Ok(format!("<style {}>{css}</style>", attrs.join(" ")))
    }

    /// Stop collecting. Further reads and writes return [`StyleError::Sealed`].
    pub fn seal(&mut self) {
        self.sealed = true;
        tracing::trace!(rules = self.sheet.rule_count(), "server stylesheet sealed");
    }
}
