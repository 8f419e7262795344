use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::config::EngineConfig;
use crate::utils::limits::{HEADER_SIZE, MAX_TREE_BYTES};

pub const DEFAULT_CONFIG_FILE: &str = "huffpack.toml";
pub const DEFAULT_EXTENSION: &str = "huff";
pub const DEFAULT_LOG_FILTER: &str = "huffpack=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Extension appended by `compress` and stripped by `decompress`
    pub extension: String,
    /// Decode every freshly written container and compare checksums
    pub verify_after_compress: bool,
    /// Used when RUST_LOG is unset
    pub log_filter: String,
    pub engine: EngineConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            verify_after_compress: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl CodecConfig {
    /// Loads `config_path`, or `huffpack.toml` when none is given. A missing
    /// default file means defaults; a missing explicit file is an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match config_path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if explicit {
                bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: CodecConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)
            .with_context(|| format!("writing {}", config_path.display()))?;
        Ok(())
    }

    /// Largest container file accepted for reading. The packed section never
    /// outgrows the input, so this is the input cap plus header and tree.
    pub fn max_container_size(&self) -> usize {
        self.engine
            .max_input_size
            .saturating_add(HEADER_SIZE + MAX_TREE_BYTES)
    }

    /// Default compress target: `<input>.<extension>`
    pub fn compressed_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_owned();
        name.push(".");
        name.push(&self.extension);
        PathBuf::from(name)
    }

    /// Default decompress target: the input with our extension removed, or
    /// `<input>.out` when it doesn't carry one.
    pub fn decompressed_path(&self, input: &Path) -> PathBuf {
        match input.extension() {
            Some(ext) if ext == self.extension.as_str() => input.with_extension(""),
            _ => {
                let mut name = input.as_os_str().to_owned();
                name.push(".out");
                PathBuf::from(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huffpack.toml");

        let mut config = CodecConfig::default();
        config.verify_after_compress = true;
        config.engine.max_input_size = 4096;
        config.save(&path).unwrap();

        assert_eq!(CodecConfig::load(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "extension = \"hp\"\n").unwrap();

        let config = CodecConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.extension, "hp");
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CodecConfig::load(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn container_at_input_limit_is_readable() {
        let mut config = CodecConfig::default();
        config.engine.max_input_size = 256;
        assert_eq!(config.max_container_size(), 256 + 16 + 320);

        // Every byte once: full tree and no size gain in the packed section
        let input: Vec<u8> = (0..=255u8).collect();
        let wire = crate::compress_with(&input, &config.engine).unwrap().to_bytes();
        assert_eq!(wire.len(), config.max_container_size());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.huff");
        crate::utils::io::write_output(&path, &wire).unwrap();

        assert!(crate::utils::io::read_input(&path, config.engine.max_input_size).is_err());
        let raw = crate::utils::io::read_input(&path, config.max_container_size()).unwrap();
        let container = crate::CompressedContainer::from_bytes(&raw).unwrap();
        assert_eq!(crate::decompress(&container).unwrap(), input);
    }

    #[test]
    fn output_paths() {
        let config = CodecConfig::default();
        assert_eq!(
            config.compressed_path(Path::new("dir/notes.txt")),
            PathBuf::from("dir/notes.txt.huff")
        );
        assert_eq!(
            config.decompressed_path(Path::new("dir/notes.txt.huff")),
            PathBuf::from("dir/notes.txt")
        );
        assert_eq!(
            config.decompressed_path(Path::new("dir/blob")),
            PathBuf::from("dir/blob.out")
        );
    }
}
