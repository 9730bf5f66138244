// src/runtime_interface.rs

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use crate::config::TrainingConfig;
use crate::corpus::Corpus;
use crate::model_loader::{self, ModelLoaderError};
use crate::rng::seeded_rng;
use crate::rnn::{NetworkError, RecurrentNetwork};
use crate::text_generator::{self, TextGeneratorError};
use crate::training::{self, TrainingError};
use crate::vocabulary::VocabularyError;

/// Train a small recurrent network on a sentence corpus and continue a seed word.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// JSON run configuration; command-line flags override its fields
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser)]
    pub epochs: Option<usize>,
    #[clap(long, value_parser)]
    pub hidden_size: Option<usize>,
    #[clap(long, value_parser)]
    pub learning_rate: Option<f64>,
    #[clap(long, value_parser)]
    pub log_every: Option<usize>,
    /// Seed for weight initialization (clock-based when omitted)
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    #[clap(long, value_parser)]
    pub seed_word: Option<String>,
    /// Number of words to generate
    #[clap(long, value_parser)]
    pub length: Option<usize>,

    /// Write the trained model to this file
    #[clap(long, value_parser)]
    pub save_model: Option<PathBuf>,
    /// Load a model instead of training a new one
    #[clap(long, value_parser)]
    pub load_model: Option<PathBuf>,
}

#[derive(Debug)]
pub enum RuntimeError {
    Config(String),
    Vocabulary(VocabularyError),
    Network(NetworkError),
    ModelLoader(ModelLoaderError),
    Training(TrainingError),
    TextGenerator(TextGeneratorError),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Config(s) => write!(f, "Config error: {}", s),
            RuntimeError::Vocabulary(e) => write!(f, "Vocabulary error: {}", e),
            RuntimeError::Network(e) => write!(f, "Network error: {}", e),
            RuntimeError::ModelLoader(e) => write!(f, "ModelLoader error: {}", e),
            RuntimeError::Training(e) => write!(f, "Training error: {}", e),
            RuntimeError::TextGenerator(e) => write!(f, "TextGenerator error: {}", e),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Config(_) => None,
            RuntimeError::Vocabulary(e) => Some(e),
            RuntimeError::Network(e) => Some(e),
            RuntimeError::ModelLoader(e) => Some(e),
            RuntimeError::Training(e) => Some(e),
            RuntimeError::TextGenerator(e) => Some(e),
        }
    }
}

impl From<VocabularyError> for RuntimeError {
    fn from(err: VocabularyError) -> Self { RuntimeError::Vocabulary(err) }
}
impl From<NetworkError> for RuntimeError {
    fn from(err: NetworkError) -> Self { RuntimeError::Network(err) }
}
impl From<ModelLoaderError> for RuntimeError {
    fn from(err: ModelLoaderError) -> Self { RuntimeError::ModelLoader(err) }
}
impl From<TrainingError> for RuntimeError {
    fn from(err: TrainingError) -> Self { RuntimeError::Training(err) }
}
impl From<TextGeneratorError> for RuntimeError {
    fn from(err: TextGeneratorError) -> Self { RuntimeError::TextGenerator(err) }
}

/// Config file (or defaults) with the command-line overrides applied.
pub fn resolve_config(args: &CliArgs) -> Result<TrainingConfig, RuntimeError> {
    let mut config = match &args.config {
        Some(path) => {
            let path_str = path.to_string_lossy();
            TrainingConfig::load(&path_str).map_err(|e| RuntimeError::Config(e.to_string()))?
        }
        None => TrainingConfig::default(),
    };

    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(hidden_size) = args.hidden_size {
        config.hidden_size = hidden_size;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    if let Some(log_every) = args.log_every {
        config.log_every = log_every;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(seed_word) = &args.seed_word {
        config.seed_word = seed_word.clone();
    }
    if let Some(length) = args.length {
        config.generate_length = length;
    }
    Ok(config)
}

/// Builds or loads the network, trains it when it was built here, and
/// returns the generated continuation.
pub fn run(args: &CliArgs) -> Result<String, RuntimeError> {
    let config = resolve_config(args)?;
    let corpus = Corpus::new(config.corpus.clone());
    let vocab = corpus.build_vocabulary()?;
    log::info!("Vocabulary size: {}", vocab.len());

    let mut net = match &args.load_model {
        Some(path) => model_loader::load_network(path)?,
        None => {
            let mut rng = seeded_rng(config.seed);
            let mut net = RecurrentNetwork::new(
                vocab.len(),
                config.hidden_size,
                vocab.len(),
                config.learning_rate,
                &mut rng,
            )?;
            let samples = corpus.training_pairs(&vocab)?;
            training::train(&mut net, &samples, &config.training_options())?;
            net
        }
    };

    if let Some(path) = &args.save_model {
        model_loader::save_network(&net, path)?;
    }

    let text = text_generator::generate_text(
        &vocab,
        &mut net,
        &config.seed_word,
        config.generate_length,
    )?;
    println!("Input text: {}", config.seed_word);
    println!("Next word predictions: {}", text);
    Ok(text)
}

pub fn run_cli() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();
    run(&args)?;
    Ok(())
}
