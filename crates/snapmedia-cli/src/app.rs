//! Shared application state for the CLI: config, decoder and metrics.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde::Serialize;
use snapmedia_core::content::{message_text, ContentType};
use snapmedia_core::error::Result;
use snapmedia_core::{Attachment, Decoder, KeyRing};

use crate::config::CliConfig;
use crate::input;
use crate::obs::DecodeMetrics;

#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
    metrics: Arc<DecodeMetrics>,
}

struct AppInner {
    cfg: CliConfig,
    decoder: Decoder,
}

/// One decoded input, as printed.
#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub source: String,
    pub form: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub attachments: Vec<ReportedAttachment>,
}

#[derive(Debug, Serialize)]
pub struct ReportedAttachment {
    #[serde(flatten)]
    pub attachment: Attachment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
}

impl App {
    /// Build application state from a validated config.
    pub fn new(cfg: CliConfig) -> Result<Self> {
        cfg.validate()?;
        let decoder = Decoder::new(cfg.decoder.to_options());
        for pack in cfg.decoder.sticker_templates.keys() {
            tracing::debug!(%pack, "sticker template registered");
        }
        Ok(Self {
            inner: Arc::new(AppInner { cfg, decoder }),
            metrics: Arc::new(DecodeMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &CliConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<DecodeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Classify and decode one input. Only malformed JSON input fails.
    pub fn decode(&self, source: &str, raw: Bytes, keys: Option<KeyRing>) -> Result<DecodeReport> {
        let input = match input::classify(raw, keys) {
            Ok(input) => input,
            Err(e) => {
                self.metrics.failures.inc(&[("reason", e.code().as_str())]);
                return Err(e);
            }
        };
        let form = input.form.as_str();

        let started = Instant::now();
        let attachments = self.inner.decoder.decode_message(&input.message);
        self.metrics.decode_duration.observe(&[("form", form)], started.elapsed());
        self.metrics.payloads.inc(&[("form", form)]);
        for a in &attachments {
            self.metrics.attachments.inc(&[("kind", a.kind.key())]);
        }

        let root = input.content_root();
        let content_type = root.as_ref().and_then(ContentType::from_content);
        let text = root
            .as_ref()
            .zip(content_type)
            .and_then(|(r, t)| message_text(r, t));

        let include_stable_id = self.inner.cfg.output.include_stable_id;
        let attachments = attachments
            .into_iter()
            .map(|attachment| ReportedAttachment {
                stable_id: include_stable_id.then(|| attachment.stable_id()).flatten(),
                attachment,
            })
            .collect();

        tracing::info!(%source, form, "payload decoded");
        Ok(DecodeReport {
            source: source.to_owned(),
            form,
            content_type,
            text,
            attachments,
        })
    }

    /// Serialize a value per the output settings.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.inner.cfg.output.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| snapmedia_core::SnapMediaError::Internal(format!("render failed: {e}")))
    }
}
