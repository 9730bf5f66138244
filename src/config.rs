// src/config.rs

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::corpus::DEFAULT_SENTENCES;
use crate::training::TrainingOptions;

/// Run configuration. Every field is optional in the JSON file; missing
/// fields fall back to the defaults below.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub corpus: Vec<String>,
    pub hidden_size: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub log_every: usize,
    pub seed_word: String,
    #[serde(alias = "length")]
    pub generate_length: usize,
    pub seed: Option<u64>, // None seeds from the clock
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            corpus: DEFAULT_SENTENCES.iter().map(|s| s.to_string()).collect(),
            hidden_size: 100,
            learning_rate: 0.0001,
            epochs: 5000,
            log_every: 1000,
            seed_word: "Matrix".to_string(),
            generate_length: 5,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn load(config_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(config_path).exists() {
            return Err(format!("Config file not found at: {}", config_path).into());
        }

        let mut file = File::open(config_path)
            .map_err(|e| format!("Failed to open config file {}: {}", config_path, e))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| format!("Failed to read config file {}: {}", config_path, e))?;

        let config: TrainingConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to deserialize JSON from {}: {}", config_path, e))?;

        Ok(config)
    }

    pub fn training_options(&self) -> TrainingOptions {
        TrainingOptions {
            epochs: self.epochs,
            log_every: self.log_every,
        }
    }
}
