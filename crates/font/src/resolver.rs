//! System font resolution.
//!
//! Maps logical family names to raw TrueType data. The production resolver
//! wraps a lazily-loaded system font database; tests inject a fake through
//! the [`FontResolver`] trait.

use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::error::FontError;
use crate::face::{FontFace, Style};

/// Universal default family, substituted when a platform fallback cannot be
/// resolved.
pub const DEFAULT_FAMILY: &str = "Arial";

/// Host operating system classification, used only to pick fallback family
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    MacOs,
    /// Linux distributions.
    Linux,
    /// Oracle Solaris / illumos.
    Solaris,
    /// Anything else.
    Unknown,
}

impl Platform {
    /// Classify the operating system this process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "solaris") {
            Platform::Solaris
        } else {
            Platform::Unknown
        }
    }

    /// Family used for the common fallback face on this platform.
    pub fn common_family(self) -> &'static str {
        match self {
            Platform::Windows => "Segoe UI",
            Platform::MacOs => "Helvetica Neue",
            Platform::Linux => "DejaVu Sans",
            Platform::Solaris => "DejaVu Sans",
            Platform::Unknown => DEFAULT_FAMILY,
        }
    }

    /// Family used for the CJK fallback face, when the platform has one.
    pub fn cjk_family(self) -> Option<&'static str> {
        match self {
            Platform::Windows => Some("Microsoft YaHei"),
            Platform::MacOs => Some("PingFang SC"),
            Platform::Linux => Some("Noto Sans CJK SC"),
            Platform::Solaris | Platform::Unknown => None,
        }
    }
}

/// Resolves a family name and style to raw TrueType data.
///
/// Implementations are called on the worker pool and may block.
pub trait FontResolver: Send + Sync {
    /// Resolve `family` with the given style bits to font data.
    fn resolve(&self, family: &str, style: Style) -> Result<Vec<u8>, FontError>;
}

/// Production resolver backed by the system font database.
///
/// The database scan is deferred to the first resolution so that constructing
/// the resolver at startup stays cheap; the scan then happens once, on the
/// worker pool.
#[derive(Default)]
pub struct SystemFontResolver {
    db: OnceLock<fontdb::Database>,
}

impl SystemFontResolver {
    /// Create a resolver; no fonts are scanned until first use.
    pub fn new() -> Self {
        Self::default()
    }

    fn database(&self) -> &fontdb::Database {
        self.db.get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            info!(faces = db.len(), "loaded system font database");
            db
        })
    }
}

impl FontResolver for SystemFontResolver {
    fn resolve(&self, family: &str, style: Style) -> Result<Vec<u8>, FontError> {
        let db = self.database();
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), fontdb::Family::SansSerif],
            weight: if style.is_bold() {
                fontdb::Weight::BOLD
            } else {
                fontdb::Weight::NORMAL
            },
            stretch: fontdb::Stretch::Normal,
            style: if style.is_italic() {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
        };

        let id = db.query(&query).ok_or_else(|| FontError::Unavailable {
            family: family.to_string(),
            reason: "no matching face in the system font database".to_string(),
        })?;

        db.with_face_data(id, |data, _index| data.to_vec())
            .ok_or_else(|| FontError::Unavailable {
                family: family.to_string(),
                reason: "matched face could not be read".to_string(),
            })
    }
}

/// Resolve a system family, substituting [`DEFAULT_FAMILY`] if it fails.
///
/// This is the fallback-of-fallback policy: the failure is logged, never
/// propagated, and the caller always gets a face as long as the default
/// family itself resolves.
pub async fn resolve_or_default(
    resolver: Arc<dyn FontResolver>,
    family: &str,
) -> Result<FontFace, FontError> {
    match FontFace::of_system(family, resolver.clone()).await {
        Ok(face) => Ok(face),
        Err(err) => {
            warn!(
                family,
                error = %err,
                "failed to resolve fallback font, substituting {DEFAULT_FAMILY}"
            );
            FontFace::of_system(DEFAULT_FAMILY, resolver).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_platform_fallbacks() {
        // Generic platform: common fallback is Arial, CJK fallback is absent.
        assert_eq!(Platform::Unknown.common_family(), "Arial");
        assert_eq!(Platform::Unknown.cjk_family(), None);
    }

    #[test]
    fn test_known_platforms_have_common_family() {
        for platform in [
            Platform::Windows,
            Platform::MacOs,
            Platform::Linux,
            Platform::Solaris,
        ] {
            assert!(!platform.common_family().is_empty());
        }
    }

    #[test]
    fn test_solaris_has_no_cjk_fallback() {
        assert_eq!(Platform::Solaris.cjk_family(), None);
    }
}
