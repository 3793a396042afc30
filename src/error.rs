use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("Cannot read input \"{}\"", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write output \"{}\"", .path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file overflow: output exceeded {max_bytes} bytes, is there an infinite loop?")]
    StreamOverflow { max_bytes: usize },

    #[error("truncated stream: {0}")]
    TruncatedStream(&'static str),

    #[error("final byte declares {0} valid bits, at most 8 are allowed")]
    InvalidTrailer(u8),

    #[error("bit sequence does not lead to any symbol of the code tree")]
    InvalidCode,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("symbol {0} has no code")]
    UnknownSymbol(String),

    #[error("Configuration file not found at \"{:?}\"", .config_file_path.as_path())]
    MissingConfigurationFile {
        config_file_path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration file")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("image error")]
    Image(#[from] image::ImageError),

    #[error("Generic I/O error")]
    IoError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, HuffError>;
