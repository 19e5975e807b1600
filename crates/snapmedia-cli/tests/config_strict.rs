#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use snapmedia_cli::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
batch:
  workerz: 8 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_INPUT");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.batch.workers, 4);
    assert_eq!(cfg.batch.max_payload_bytes, 8 * 1024 * 1024);
    assert!(!cfg.output.pretty);
    assert!(cfg.output.include_stable_id);
    assert!(cfg.decoder.sticker_templates.is_empty());
}

#[test]
fn unsupported_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn workers_out_of_range_rejected() {
    let bad = r#"
version: 1
batch:
  workers: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_INPUT");
}

#[test]
fn sticker_template_needs_placeholder() {
    let bad = r#"
version: 1
decoder:
  sticker_templates:
    partner: "https://cdn.example.com/stickers/fixed.webp"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("{reference}"));
}

#[test]
fn builtin_pack_cannot_be_overridden() {
    let bad = r#"
version: 1
decoder:
  sticker_templates:
    snap: "https://cdn.example.com/{reference}"
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn sticker_template_reaches_decoder_options() {
    let ok = r#"
version: 1
decoder:
  sticker_templates:
    partner: "https://cdn.example.com/stickers/{reference}.webp"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let opts = cfg.decoder.to_options();
    assert_eq!(
        opts.stickers.templates().get("partner").map(String::as_str),
        Some("https://cdn.example.com/stickers/{reference}.webp")
    );
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config::load_from_file(&dir.path().join("absent.yaml")).expect("defaults");
    assert_eq!(cfg.version, 1);
}

#[test]
fn file_is_read_and_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapmedia.yaml");
    std::fs::write(&path, "version: 1\noutput:\n  pretty: true\n").unwrap();
    let cfg = config::load_from_file(&path).expect("must parse");
    assert!(cfg.output.pretty);
}
