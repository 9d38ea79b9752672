//! Dart decoder session management and the autoregressive generation loop.
//!
//! The decoder is exported without KV cache, so each step re-runs the full
//! sequence. Prompt expansion budgets are small (250 tokens) and the model
//! is only invoked in single-file mode, so the simple loop is adequate.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;
use rand::Rng;

use crate::error::GenerateError;

use super::{
    sample_token, GenerationConfig, DART_MODEL_LOCAL_NAME, DART_TOKENIZER_LOCAL_NAME,
};

/// End-of-sequence token in the Dart v2 vocabulary.
const EOS_TOKEN: &str = "<|eos|>";

/// Wraps the Dart ONNX decoder and its tokenizer.
#[derive(Debug)]
pub struct DartGenerator {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    /// True when the exported graph also takes an attention mask.
    wants_attention_mask: bool,
    eos_id: Option<u32>,
}

impl DartGenerator {
    /// Load the Dart decoder from `<dart_dir>`.
    ///
    /// Expects `model.onnx` and `tokenizer.json`; fails with a download hint
    /// when either is missing.
    pub fn load(dart_dir: &Path) -> Result<Self, GenerateError> {
        let model_path = dart_dir.join(DART_MODEL_LOCAL_NAME);
        let tokenizer_path = dart_dir.join(DART_TOKENIZER_LOCAL_NAME);

        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                return Err(GenerateError::Model {
                    message: format!(
                        "Dart model file not found at {path:?}. Run `dagger models download --dart` first."
                    ),
                });
            }
        }

        let session = Session::builder()
            .map_err(|e| GenerateError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(&model_path)
            .map_err(|e| GenerateError::Model {
                message: format!("Failed to load Dart decoder: {e}"),
            })?;

        let tokenizer =
            tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| GenerateError::Model {
                message: format!("Failed to load tokenizer: {e}"),
            })?;

        let wants_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");
        let eos_id = tokenizer.token_to_id(EOS_TOKEN);

        tracing::debug!(
            "Loaded Dart decoder (inputs: {:?}, eos id: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            eos_id
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            wants_attention_mask,
            eos_id,
        })
    }

    /// Generate an expanded tag list from a composed prompt.
    ///
    /// Returns only the newly generated text, decoded without special
    /// tokens and normalized to a comma-separated tag list.
    pub fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, GenerateError> {
        self.generate_with_rng(prompt, config, &mut rand::thread_rng())
    }

    /// Generation loop with an injectable RNG.
    pub fn generate_with_rng<R: Rng>(
        &self,
        prompt: &str,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<String, GenerateError> {
        // The composed prompt already carries <|bos|>, so no special tokens
        // are added here.
        let encoding = self
            .tokenizer
            .encode(prompt, false)
            .map_err(|e| GenerateError::Tokenize {
                message: e.to_string(),
            })?;

        let mut ids: Vec<u32> = encoding.get_ids().to_vec();
        let prompt_len = ids.len();

        for _ in 0..config.max_new_tokens {
            let logits = self.forward(&ids)?;
            let next = sample_token(&logits, config, rng) as u32;

            if self.eos_id == Some(next) {
                break;
            }
            ids.push(next);
        }

        let generated = &ids[prompt_len..];
        let decoded = self
            .tokenizer
            .decode(generated, true)
            .map_err(|e| GenerateError::Inference {
                message: format!("Failed to decode generated tokens: {e}"),
            })?;

        Ok(normalize_tag_list(&decoded))
    }

    /// Run one decoder step and return the last-position logits.
    fn forward(&self, ids: &[u32]) -> Result<Vec<f32>, GenerateError> {
        let seq_len = ids.len();
        let input_ids: Vec<i64> = ids.iter().map(|&id| id as i64).collect();

        let input_value = Value::from_array((vec![1i64, seq_len as i64], input_ids)).map_err(
            |e| GenerateError::Inference {
                message: format!("Failed to create input tensor: {e}"),
            },
        )?;

        let mut session = self.session.lock().map_err(|e| GenerateError::Inference {
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = if self.wants_attention_mask {
            let mask_value =
                Value::from_array((vec![1i64, seq_len as i64], vec![1i64; seq_len])).map_err(
                    |e| GenerateError::Inference {
                        message: format!("Failed to create attention mask: {e}"),
                    },
                )?;
            session.run(ort::inputs![
                "input_ids" => input_value,
                "attention_mask" => mask_value,
            ])
        } else {
            session.run(ort::inputs!["input_ids" => input_value])
        }
        .map_err(|e| GenerateError::Inference {
            message: format!("Dart decoder run failed: {e}"),
        })?;

        // Logits output: [1, seq_len, vocab].
        let logits = outputs
            .iter()
            .find(|(name, _)| *name == "logits")
            .or_else(|| outputs.iter().next())
            .ok_or_else(|| GenerateError::Inference {
                message: "Decoder produced no outputs".to_string(),
            })?;

        let (shape, data) =
            logits
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| GenerateError::Inference {
                    message: format!("Failed to extract logits: {e}"),
                })?;

        if shape.len() != 3 {
            return Err(GenerateError::Inference {
                message: format!("Unexpected logits shape: {shape:?}"),
            });
        }

        let vocab = shape[2] as usize;
        let last_offset = (shape[1] as usize - 1) * vocab;
        Ok(data[last_offset..last_offset + vocab].to_vec())
    }
}

/// Normalize decoded output into a clean comma-separated tag list, dropping
/// empty segments left behind by special-token removal.
fn normalize_tag_list(decoded: &str) -> String {
    decoded
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
