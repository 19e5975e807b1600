//! Top-level facade crate for snapmedia.
//!
//! Re-exports the decoder core and the CLI library so users can depend on a single crate.

pub mod core {
    pub use snapmedia_core::*;
}

pub mod cli {
    pub use snapmedia_cli::*;
}
