use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, ShabdError};

fn default_preserve_formatting() -> bool {
    true
}

fn default_batch_size() -> usize {
    10
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the persisted documents
    pub data_dir: PathBuf,
    /// Word map document file name
    pub word_map_file: String,
    /// Phrase map document file name
    pub phrase_map_file: String,
    /// Training corpus document file name
    pub corpus_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shortest phrase candidate, in tokens
    pub min_phrase_len: usize,
    /// Longest phrase candidate, in tokens
    pub max_phrase_len: usize,
    /// Keep paragraph breaks in the output when the caller does not say otherwise
    #[serde(default = "default_preserve_formatting")]
    pub preserve_formatting: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Word alignment only runs when both sides have at most this many tokens
    pub max_alignment_tokens: usize,
    /// Word alignment only runs when the token counts differ by at most this much
    pub max_token_difference: usize,
    /// Pairs submitted per batch when importing a training file
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("model_data"),
            word_map_file: "word_map.json".to_string(),
            phrase_map_file: "phrase_map.json".to_string(),
            corpus_file: "training_data.json".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_phrase_len: 2,
            max_phrase_len: 4,
            preserve_formatting: true,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_alignment_tokens: 10,
            max_token_difference: 3,
            batch_size: 10,
        }
    }
}

impl StoreConfig {
    pub fn word_map_path(&self) -> PathBuf {
        self.data_dir.join(&self.word_map_file)
    }

    pub fn phrase_map_path(&self) -> PathBuf {
        self.data_dir.join(&self.phrase_map_file)
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join(&self.corpus_file)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShabdError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ShabdError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShabdError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ShabdError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.engine.min_phrase_len == 0 {
            return Err(ShabdError::Config(
                "engine.min_phrase_len must be at least 1".to_string(),
            ));
        }
        if self.engine.min_phrase_len > self.engine.max_phrase_len {
            return Err(ShabdError::Config(format!(
                "engine.min_phrase_len ({}) exceeds engine.max_phrase_len ({})",
                self.engine.min_phrase_len, self.engine.max_phrase_len
            )));
        }
        if self.training.batch_size == 0 {
            return Err(ShabdError::Config(
                "training.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
