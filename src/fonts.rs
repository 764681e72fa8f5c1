//! Font resolution with a guaranteed fallback.

use core::fmt;

use futures::future::try_join;
use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::host::FontLoader;

/// Host font reference: family plus style name (e.g. `Inter` / `Bold`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontRef {
    pub family: String,
    pub style: String,
}

impl FontRef {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl fmt::Display for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Fonts used by one summary: `primary` for region entries, `accent` for titles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontPair {
    pub primary: FontRef,
    pub accent: FontRef,
}

impl FontPair {
    /// Same face for both roles.
    pub fn uniform(font: FontRef) -> Self {
        Self {
            primary: font.clone(),
            accent: font,
        }
    }
}

/// Load the preferred primary/accent fonts, falling back to the configured
/// default face for both when either is unavailable.
///
/// Never fails: a failure to load the fallback itself is only logged, since the
/// host guarantees that face.
pub async fn resolve_fonts<L>(loader: &L, config: &SummaryConfig) -> FontPair
where
    L: FontLoader + ?Sized,
{
    let fonts = &config.fonts;
    match try_join(
        loader.load_font(&fonts.primary),
        loader.load_font(&fonts.accent),
    )
    .await
    {
        Ok(_) => FontPair {
            primary: fonts.primary.clone(),
            accent: fonts.accent.clone(),
        },
        Err(err) => {
            log::warn!(
                "preferred fonts unavailable ({}); using {} for all labels",
                err,
                fonts.fallback
            );
            if let Err(err) = loader.load_font(&fonts.fallback).await {
                log::warn!("fallback font {} did not load: {}", fonts.fallback, err);
            }
            FontPair::uniform(fonts.fallback.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use async_trait::async_trait;
    use std::cell::RefCell;

    struct Loader {
        missing: Vec<FontRef>,
        calls: RefCell<Vec<FontRef>>,
    }

    #[async_trait(?Send)]
    impl FontLoader for Loader {
        async fn load_font(&self, font: &FontRef) -> Result<(), HostError> {
            self.calls.borrow_mut().push(font.clone());
            if self.missing.contains(font) {
                return Err(HostError::new("load_font", format!("{} missing", font)));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn preferred_fonts_are_used_when_available() {
        let config = SummaryConfig::default();
        let loader = Loader {
            missing: Vec::new(),
            calls: RefCell::new(Vec::new()),
        };
        let pair = resolve_fonts(&loader, &config).await;
        assert_eq!(pair.primary, config.fonts.primary);
        assert_eq!(pair.accent, config.fonts.accent);
        assert_eq!(loader.calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn missing_accent_falls_back_for_both_roles() {
        let config = SummaryConfig::default();
        let loader = Loader {
            missing: vec![config.fonts.accent.clone()],
            calls: RefCell::new(Vec::new()),
        };
        let pair = resolve_fonts(&loader, &config).await;
        assert_eq!(pair, FontPair::uniform(config.fonts.fallback.clone()));
        assert_eq!(loader.calls.borrow().last(), Some(&config.fonts.fallback));
    }

    #[tokio::test]
    async fn broken_fallback_still_yields_a_pair() {
        let config = SummaryConfig::default();
        let loader = Loader {
            missing: vec![
                config.fonts.primary.clone(),
                config.fonts.accent.clone(),
                config.fonts.fallback.clone(),
            ],
            calls: RefCell::new(Vec::new()),
        };
        let pair = resolve_fonts(&loader, &config).await;
        assert_eq!(pair.primary, config.fonts.fallback);
    }
}
