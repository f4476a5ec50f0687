//! Core logic behind the `typed-json` binary.
//!
//! The binary decodes a document read from stdin against a type signature and
//! prints the canonical re-encoding: dates in the output layout, keys and
//! scalars narrowed to the signature, null policies applied.

use std::sync::OnceLock;

use stream_util::TextError;
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::codec::JsonCodec;
use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::options::CodecOptions;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs a stderr subscriber once for the process.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`, which surfaces
/// unresolved-generic warnings without debug noise.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let result = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init();
        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("first argument must be a type signature")]
    MissingSignature,

    #[error("cannot read options file {path}: {source}")]
    Options {
        path: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Input(#[from] TextError),
}

/// Builds the codec, reading options from `path` when one is given.
pub fn load_codec(path: Option<&str>) -> Result<JsonCodec, CliError> {
    let Some(path) = path else {
        return Ok(JsonCodec::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Options {
        path: path.to_string(),
        source,
    })?;
    Ok(JsonCodec::new(CodecOptions::from_json(&text)?)?)
}

/// Decodes `input` against `signature` and re-encodes it.
pub fn normalize(codec: &JsonCodec, input: &str, signature: &str) -> Result<String, CliError> {
    let descriptor: TypeDescriptor = signature.parse()?;
    let value = codec.parse_as(input.trim(), &descriptor)?;
    Ok(codec.encode(&value))
}
