//! Sticker catalog URL templates.
//!
//! Catalog stickers carry no key material; their URL is derived from the pack
//! id and the sticker reference. Two packs are built in. Other packs resolve
//! only when a `{reference}` template has been registered for them.

use std::collections::BTreeMap;

use crate::attachment::StickerPack;

const PLATFORM_STICKER_BASE: &str = "https://gcs.sc-cdn.net/sticker-packs-sc/stickers/";
const AVATAR_RENDER_BASE: &str = "https://cf-st.sc-cdn.net/3d/render/";

/// Placeholder substituted in registered templates.
pub const REFERENCE_PLACEHOLDER: &str = "{reference}";

#[derive(Debug, Clone, Default)]
pub struct StickerCatalog {
    templates: BTreeMap<String, String>,
}

impl StickerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a URL template for an additional pack id.
    pub fn with_template(mut self, pack_id: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(pack_id.into(), template.into());
        self
    }

    pub fn templates(&self) -> &BTreeMap<String, String> {
        &self.templates
    }

    /// Resolve a catalog sticker to its pack and URL.
    pub fn resolve(&self, pack_id: &str, reference: &str) -> Option<(StickerPack, String)> {
        match pack_id {
            "snap" => Some((
                StickerPack::Platform,
                format!("{PLATFORM_STICKER_BASE}{reference}"),
            )),
            "bitmoji" => avatar_url(reference).map(|url| (StickerPack::Avatar, url)),
            other => {
                let template = self.templates.get(other)?;
                Some((
                    StickerPack::Other(other.to_owned()),
                    template.replace(REFERENCE_PLACEHOLDER, reference),
                ))
            }
        }
    }
}

/// `<pose>:<version>:<part>:<part>...` → `<pose>-<parts joined>-v<version>.webp`.
fn avatar_url(reference: &str) -> Option<String> {
    let mut parts = reference.split(':');
    let pose = parts.next()?;
    let version = parts.next()?;
    let rest = parts.collect::<Vec<_>>().join("-");
    Some(format!("{AVATAR_RENDER_BASE}{pose}-{rest}-v{version}.webp?ua=2"))
}
