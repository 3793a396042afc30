use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde_derive::Deserialize;

use crate::{bitmanipulation::DEFAULT_MAX_BYTES, HuffError};

/// Kind of symbols a file is split into before compression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// UTF-8 text, one symbol per character
    Text,
    /// Raw bytes
    Bytes,
    /// Image pixels as packed ARGB colors
    Image,
}

impl Alphabet {
    fn extension(&self) -> &'static str {
        match self {
            Alphabet::Text => "txt",
            Alphabet::Bytes => "bin",
            Alphabet::Image => "png",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_output_bytes: usize,
    pub alphabet: Alphabet,
    pub compressed_suffix: String,
    pub decompressed_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_BYTES,
            alphabet: Alphabet::Text,
            compressed_suffix: "_compressed.huff".to_string(),
            decompressed_suffix: "_decompressed".to_string(),
        }
    }
}

impl Config {
    pub fn new(path: &PathBuf) -> Result<Self, HuffError> {
        let content = fs::read_to_string(path).map_err(|e| HuffError::MissingConfigurationFile {
            config_file_path: path.clone(),
            source: e,
        })?;
        toml::from_str(&content).map_err(HuffError::InvalidConfig)
    }

    /// `dir/name.ext` -> `dir/name<compressed_suffix>`
    pub fn compressed_path(&self, input: &Path) -> PathBuf {
        let stem = file_stem(input);
        input.with_file_name(format!("{}{}", stem, self.compressed_suffix))
    }

    /// `dir/name<compressed_suffix>` -> `dir/name<decompressed_suffix>.<ext>`
    pub fn decompressed_path(&self, input: &Path, alphabet: Alphabet) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = match name.strip_suffix(&self.compressed_suffix) {
            Some(stem) => stem.to_string(),
            None => file_stem(input),
        };
        input.with_file_name(format!(
            "{}{}.{}",
            stem,
            self.decompressed_suffix,
            alphabet.extension()
        ))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
