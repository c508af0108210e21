//! Process-wide font registry.
//!
//! The [`FontManager`] owns every registered [`FontFace`], the two
//! asynchronously-resolved fallback faces, and the glyph page manager
//! singleton. It is an explicit service object: construct one at startup,
//! share it by handle, and await [`FontManager::init_fallbacks`] before the
//! first frame. Queueing runs on the worker pool; renderer access belongs to
//! the rendering thread.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};
use std::thread::ThreadId;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::FontError;
use crate::face::FontFace;
use crate::glyph::GlyphPageManager;
use crate::renderer::FontRenderer;
use crate::resolver::{resolve_or_default, FontResolver, Platform, SystemFontResolver};

/// Family `active_renderer` looks up before falling back to the common
/// fallback face.
pub const PREFERRED_FAMILY: &str = "Inter";

/// Recognized extension for queued font files.
const TRUETYPE_EXTENSION: &str = "ttf";

/// Registry mapping family names to faces.
///
/// Lookup and queueing may happen from any task; name collisions are
/// last-writer-wins. The glyph page manager is materialized exactly once,
/// after which later queue operations no longer affect glyph pages.
pub struct FontManager {
    platform: Platform,
    resolver: Arc<dyn FontResolver>,
    faces: RwLock<HashMap<String, Arc<FontFace>>>,
    common: OnceCell<Arc<FontFace>>,
    cjk: OnceCell<Option<Arc<FontFace>>>,
    glyphs: OnceLock<Arc<GlyphPageManager>>,
    render_thread: OnceLock<ThreadId>,
}

impl FontManager {
    /// Create a registry for the given platform with an injected resolver.
    pub fn new(platform: Platform, resolver: Arc<dyn FontResolver>) -> Self {
        Self {
            platform,
            resolver,
            faces: RwLock::new(HashMap::new()),
            common: OnceCell::new(),
            cjk: OnceCell::new(),
            glyphs: OnceLock::new(),
            render_thread: OnceLock::new(),
        }
    }

    /// Create a registry for the current platform using the system font
    /// database.
    pub fn with_system_resolver() -> Self {
        Self::new(Platform::current(), Arc::new(SystemFontResolver::new()))
    }

    /// The common fallback face, resolved and measured on first call and
    /// cached for the process lifetime. Concurrent callers await the same
    /// in-flight resolution.
    ///
    /// Resolution failures substitute the universal default family; the face
    /// is also registered in the lookup table under its own name.
    ///
    /// # Panics
    ///
    /// If not even the universal default family can be resolved, which means
    /// the system has no usable fonts at all.
    pub async fn common_fallback(&self) -> Arc<FontFace> {
        self.common
            .get_or_init(|| async {
                let family = self.platform.common_family();
                let face = resolve_or_default(self.resolver.clone(), family)
                    .await
                    .expect("no usable fallback font could be resolved on this system");
                info!(family = face.name(), "resolved common fallback font");
                self.register(face)
            })
            .await
            .clone()
    }

    /// The CJK fallback face, or `None` when the platform has no known CJK
    /// family or it fails to resolve. Memoized like [`common_fallback`].
    ///
    /// [`common_fallback`]: FontManager::common_fallback
    pub async fn cjk_fallback(&self) -> Option<Arc<FontFace>> {
        self.cjk
            .get_or_init(|| async {
                let family = self.platform.cjk_family()?;
                match FontFace::of_system(family, self.resolver.clone()).await {
                    Ok(face) => {
                        info!(family = face.name(), "resolved CJK fallback font");
                        Some(Arc::new(face))
                    }
                    Err(err) => {
                        warn!(family, error = %err, "failed to resolve CJK fallback font");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Resolve both fallback faces. Call once during startup, before any
    /// renderer access.
    pub async fn init_fallbacks(&self) {
        self.common_fallback().await;
        self.cjk_fallback().await;
    }

    /// Queue a font file for registration under its self-reported family
    /// name.
    ///
    /// Missing files, non-TrueType extensions, already-queued paths, and
    /// malformed data are logged and leave the registry untouched; none of
    /// them are errors.
    pub async fn queue_font_from_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            warn!(path = %path.display(), "font file does not exist, not queueing");
            return;
        }

        let is_truetype = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(TRUETYPE_EXTENSION))
            .unwrap_or(false);
        if !is_truetype {
            warn!(path = %path.display(), "not a TrueType font file, not queueing");
            return;
        }

        if self.is_queued(&path) {
            warn!(path = %path.display(), "font file already queued, ignoring");
            return;
        }

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read font file");
                return;
            }
        };

        match FontFace::of_data(data, Some(path.clone())).await {
            Ok(face) => {
                let face = self.register(face);
                info!(family = face.name(), path = %path.display(), "queued font file");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to queue font file");
            }
        }
    }

    /// Queue an in-memory font for registration under its self-reported
    /// family name.
    ///
    /// Unlike [`queue_font_from_file`], no duplicate or format guards are
    /// applied here; malformed data surfaces as an error and callers own any
    /// validation of streamed bytes.
    ///
    /// [`queue_font_from_file`]: FontManager::queue_font_from_file
    pub async fn queue_font_from_stream(&self, data: Vec<u8>) -> Result<(), FontError> {
        let face = FontFace::of_data(data, None).await?;
        let face = self.register(face);
        info!(family = face.name(), "queued font from stream");
        Ok(())
    }

    /// Look up a registered face by family name.
    pub fn font_face(&self, name: &str) -> Option<Arc<FontFace>> {
        self.faces
            .read()
            .expect("font registry poisoned")
            .get(name)
            .cloned()
    }

    /// Number of registered faces.
    pub fn face_count(&self) -> usize {
        self.faces.read().expect("font registry poisoned").len()
    }

    /// Names of all registered faces, in no particular order.
    pub fn face_names(&self) -> Vec<String> {
        self.faces
            .read()
            .expect("font registry poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Bake glyph pages from every face registered so far, with the CJK
    /// fallback as supplementary source.
    ///
    /// Call once, after all fonts of interest have been queued and awaited.
    /// Fonts queued afterwards are still looked up by name but get no glyph
    /// pages. A second call keeps the first manager and logs a warning.
    pub async fn create_glyph_manager(&self) {
        let cjk = self.cjk_fallback().await;
        let faces: Vec<Arc<FontFace>> = self
            .faces
            .read()
            .expect("font registry poisoned")
            .values()
            .cloned()
            .collect();
        let count = faces.len();

        let manager =
            tokio::task::spawn_blocking(move || GlyphPageManager::new(&faces, cjk.as_ref()))
                .await
                .expect("glyph page baking task panicked");

        if self.glyphs.set(Arc::new(manager)).is_err() {
            warn!("glyph page manager already created, keeping the first");
        } else {
            info!(faces = count, "glyph page manager created");
        }
    }

    /// The glyph page manager.
    ///
    /// # Panics
    ///
    /// If called before [`create_glyph_manager`] has completed; reading glyph
    /// pages that were never baked is a programming error, not a recoverable
    /// state.
    ///
    /// [`create_glyph_manager`]: FontManager::create_glyph_manager
    pub fn glyph_manager(&self) -> Arc<GlyphPageManager> {
        self.glyphs
            .get()
            .cloned()
            .expect("glyph page manager accessed before create_glyph_manager()")
    }

    /// The renderer for the preferred family, or for the common fallback
    /// face when the preferred family was never queued. The renderer is
    /// built on first access and cached on its face.
    ///
    /// Rendering-thread only; the first caller's thread is taken as the
    /// rendering thread and later calls are debug-asserted against it.
    ///
    /// # Panics
    ///
    /// If the glyph page manager has not been created, or the fallback faces
    /// were never initialized.
    pub fn active_renderer(&self) -> FontRenderer {
        self.assert_render_thread();
        let glyphs = self.glyph_manager();
        let face = self.font_face(PREFERRED_FAMILY).unwrap_or_else(|| {
            self.common
                .get()
                .cloned()
                .expect("fallback font not initialized; await init_fallbacks() during startup")
        });
        face.renderer(&glyphs).clone()
    }

    fn assert_render_thread(&self) {
        if cfg!(debug_assertions) {
            let current = std::thread::current().id();
            let owner = *self.render_thread.get_or_init(|| current);
            debug_assert_eq!(
                owner, current,
                "active_renderer called off the rendering thread"
            );
        }
    }

    fn is_queued(&self, path: &Path) -> bool {
        self.faces
            .read()
            .expect("font registry poisoned")
            .values()
            .any(|face| face.file() == Some(path))
    }

    fn register(&self, face: FontFace) -> Arc<FontFace> {
        let face = Arc::new(face);
        let previous = self
            .faces
            .write()
            .expect("font registry poisoned")
            .insert(face.name().to_string(), face.clone());
        if previous.is_some() {
            debug!(family = face.name(), "replaced previously registered face");
        }
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::Style;

    struct NoFonts;

    impl FontResolver for NoFonts {
        fn resolve(&self, family: &str, _style: Style) -> Result<Vec<u8>, FontError> {
            Err(FontError::Unavailable {
                family: family.to_string(),
                reason: "test resolver has no fonts".to_string(),
            })
        }
    }

    fn empty_manager() -> FontManager {
        FontManager::new(Platform::Unknown, Arc::new(NoFonts))
    }

    #[test]
    fn test_font_face_unknown_name_is_none() {
        let manager = empty_manager();
        assert!(manager.font_face("Nope").is_none());
        assert_eq!(manager.face_count(), 0);
    }

    #[test]
    #[should_panic(expected = "glyph page manager accessed before")]
    fn test_glyph_manager_before_creation_panics() {
        let manager = empty_manager();
        let _ = manager.glyph_manager();
    }
}
