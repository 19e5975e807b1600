use std::collections::BTreeMap;

use serde::Deserialize;
use snapmedia_core::catalog::{StickerCatalog, REFERENCE_PLACEHOLDER};
use snapmedia_core::error::{Result, SnapMediaError};
use snapmedia_core::DecodeOptions;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub version: u32,

    #[serde(default)]
    pub decoder: DecoderSection,

    #[serde(default)]
    pub batch: BatchSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: 1,
            decoder: DecoderSection::default(),
            batch: BatchSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl CliConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SnapMediaError::UnsupportedVersion(self.version));
        }

        self.decoder.validate()?;
        self.batch.validate()?;

        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecoderSection {
    /// Extra sticker packs: pack id -> URL template containing `{reference}`.
    #[serde(default)]
    pub sticker_templates: BTreeMap<String, String>,
}

impl DecoderSection {
    pub fn validate(&self) -> Result<()> {
        for (pack, template) in &self.sticker_templates {
            if pack == "snap" || pack == "bitmoji" {
                return Err(SnapMediaError::BadInput(format!(
                    "decoder.sticker_templates: pack id {pack} is built in"
                )));
            }
            if !template.starts_with("https://") {
                return Err(SnapMediaError::BadInput(format!(
                    "decoder.sticker_templates.{pack} must be an https:// url"
                )));
            }
            if !template.contains(REFERENCE_PLACEHOLDER) {
                return Err(SnapMediaError::BadInput(format!(
                    "decoder.sticker_templates.{pack} must contain {REFERENCE_PLACEHOLDER}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_options(&self) -> DecodeOptions {
        let stickers = self
            .sticker_templates
            .iter()
            .fold(StickerCatalog::new(), |catalog, (pack, template)| {
                catalog.with_template(pack.clone(), template.clone())
            });
        DecodeOptions { stickers }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSection {
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: u64,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

impl BatchSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.workers) {
            return Err(SnapMediaError::BadInput(
                "batch.workers must be between 1 and 64".into(),
            ));
        }
        if !(1024..=64 * 1024 * 1024).contains(&self.max_payload_bytes) {
            return Err(SnapMediaError::BadInput(
                "batch.max_payload_bytes must be between 1024 and 67108864".into(),
            ));
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    4
}
fn default_max_payload_bytes() -> u64 {
    8 * 1024 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub pretty: bool,

    #[serde(default = "default_include_stable_id")]
    pub include_stable_id: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            pretty: false,
            include_stable_id: default_include_stable_id(),
        }
    }
}

fn default_include_stable_id() -> bool {
    true
}
