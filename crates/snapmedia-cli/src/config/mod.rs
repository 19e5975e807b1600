//! CLI config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use snapmedia_core::error::{Result, SnapMediaError};

pub use schema::{BatchSection, CliConfig, DecoderSection, OutputSection};

/// Load and validate `path`. A missing file yields the defaults.
pub fn load_from_file(path: &Path) -> Result<CliConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(CliConfig::default())
        }
        Err(e) => Err(SnapMediaError::Io(e)),
    }
}

pub fn load_from_str(s: &str) -> Result<CliConfig> {
    let cfg: CliConfig = serde_yaml::from_str(s)
        .map_err(|e| SnapMediaError::BadInput(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
