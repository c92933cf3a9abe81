//! Text tokenizers
//!
//! Two serialized formats are accepted: the word-index export written by the
//! training pipeline's text tokenizer, and a Hugging Face `tokenizer.json`.
//! Both are stateless once loaded and shared read-only between requests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use reach_types::{ReachError, Result};
use serde::Deserialize;
use tokenizers::Tokenizer as HuggingFaceTokenizer;
use tracing::{debug, info, trace};

/// Characters stripped from text before word splitting
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Maps free text to token ids
pub trait TextTokenizer: Send + Sync + std::fmt::Debug {
    /// Token ids for `text`, unpadded and untruncated
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Number of ids this tokenizer can emit
    fn vocab_size(&self) -> usize;

    /// Short format name for logs
    fn kind(&self) -> &'static str;
}

/// Shared tokenizer handle
pub type TokenizerHandle = Arc<dyn TextTokenizer>;

/// `word_index` is stored either as a JSON object or as a JSON string
/// containing that object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordIndexField {
    Encoded(String),
    Map(HashMap<String, u32>),
}

impl WordIndexField {
    fn into_map(self) -> Result<HashMap<String, u32>> {
        match self {
            WordIndexField::Map(map) => Ok(map),
            WordIndexField::Encoded(s) => serde_json::from_str(&s).map_err(|e| {
                ReachError::tokenizer(format!("Invalid encoded word_index: {}", e))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WordIndexConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_true")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: WordIndexField,
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_true() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

#[derive(Debug, Deserialize)]
struct WordIndexDocument {
    class_name: String,
    config: WordIndexConfig,
}

/// Word-level tokenizer driven by a fitted word → id table.
///
/// Ids start at 1; 0 is reserved for padding. Words absent from the table
/// (or ranked at or beyond `num_words`) map to the OOV id when one is
/// configured and are dropped otherwise.
#[derive(Debug, Clone)]
pub struct WordIndexTokenizer {
    word_index: HashMap<String, u32>,
    num_words: Option<usize>,
    filters: String,
    lower: bool,
    split: String,
    char_level: bool,
    oov_id: Option<u32>,
}

impl WordIndexTokenizer {
    /// Tokenizer with default text normalization
    pub fn new(word_index: HashMap<String, u32>, num_words: Option<usize>) -> Self {
        Self {
            word_index,
            num_words,
            filters: default_filters(),
            lower: true,
            split: default_split(),
            char_level: false,
            oov_id: None,
        }
    }

    /// Route unknown words to the id of `oov_token`
    pub fn with_oov_token(mut self, oov_token: &str) -> Self {
        self.oov_id = self.word_index.get(oov_token).copied();
        self
    }

    /// Parse the serialized word-index document
    pub fn from_json(content: &str) -> Result<Self> {
        let doc: WordIndexDocument = serde_json::from_str(content)
            .map_err(|e| ReachError::tokenizer(format!("Invalid tokenizer document: {}", e)))?;

        if doc.class_name != "Tokenizer" {
            return Err(ReachError::tokenizer(format!(
                "Unexpected tokenizer class: {}",
                doc.class_name
            )));
        }

        let config = doc.config;
        let word_index = config.word_index.into_map()?;
        if config.split.is_empty() && !config.char_level {
            return Err(ReachError::tokenizer("Tokenizer split string is empty"));
        }
        let oov_id = match &config.oov_token {
            Some(token) => Some(word_index.get(token).copied().ok_or_else(|| {
                ReachError::tokenizer(format!("OOV token '{}' missing from word_index", token))
            })?),
            None => None,
        };

        debug!(
            "Word-index tokenizer: {} words, num_words={:?}, oov={:?}",
            word_index.len(),
            config.num_words,
            config.oov_token
        );

        Ok(Self {
            word_index,
            num_words: config.num_words,
            filters: config.filters,
            lower: config.lower,
            split: config.split,
            char_level: config.char_level,
            oov_id,
        })
    }

    /// Normalized word sequence for `text`
    pub fn words(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.char_level {
            return text.chars().map(String::from).collect();
        }

        let translated: String = text
            .chars()
            .map(|c| {
                if self.filters.contains(c) {
                    self.split.clone()
                } else {
                    c.to_string()
                }
            })
            .collect();

        translated
            .split(self.split.as_str())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn lookup(&self, word: &str) -> Option<u32> {
        match self.word_index.get(word) {
            Some(&id) => match self.num_words {
                Some(limit) if id as usize >= limit => self.oov_id,
                _ => Some(id),
            },
            None => self.oov_id,
        }
    }
}

impl TextTokenizer for WordIndexTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let ids: Vec<u32> = self
            .words(text)
            .iter()
            .filter_map(|w| self.lookup(w))
            .collect();
        trace!("Encoded {} chars to {} ids", text.len(), ids.len());
        Ok(ids)
    }

    fn vocab_size(&self) -> usize {
        let table = self.word_index.values().max().map_or(0, |&m| m as usize + 1);
        match self.num_words {
            Some(limit) => limit.min(table),
            None => table,
        }
    }

    fn kind(&self) -> &'static str {
        "word_index"
    }
}

/// Hugging Face tokenizer adapter; special tokens are never added
#[derive(Debug)]
pub struct HuggingFaceTokenizerAdapter {
    tokenizer: HuggingFaceTokenizer,
}

impl HuggingFaceTokenizerAdapter {
    pub fn new(tokenizer: HuggingFaceTokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let tokenizer = HuggingFaceTokenizer::from_bytes(content.as_bytes())
            .map_err(|e| ReachError::tokenizer(format!("Failed to load tokenizer: {}", e)))?;
        Ok(Self::new(tokenizer))
    }
}

impl TextTokenizer for HuggingFaceTokenizerAdapter {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| ReachError::inference(format!("Tokenization failed: {}", e)))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    fn kind(&self) -> &'static str {
        "huggingface"
    }
}

/// Parse a serialized tokenizer, detecting its format
pub fn tokenizer_from_json(content: &str) -> Result<TokenizerHandle> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| ReachError::tokenizer(format!("Tokenizer is not valid JSON: {}", e)))?;

    if value.get("class_name").and_then(|c| c.as_str()) == Some("Tokenizer") {
        Ok(Arc::new(WordIndexTokenizer::from_json(content)?))
    } else {
        Ok(Arc::new(HuggingFaceTokenizerAdapter::from_json(content)?))
    }
}

/// Load the tokenizer artifact from disk
pub fn load_tokenizer(path: &Path) -> Result<TokenizerHandle> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ReachError::artifact(format!("Failed to read tokenizer {}: {}", path.display(), e))
    })?;
    let tokenizer = tokenizer_from_json(&content)?;
    info!(
        "Tokenizer loaded ({} format, vocab {})",
        tokenizer.kind(),
        tokenizer.vocab_size()
    );
    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(words: &[&str]) -> HashMap<String, u32> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.to_string(), i as u32 + 1))
            .collect()
    }

    #[test]
    fn words_are_lowercased_and_filtered() {
        let tok = WordIndexTokenizer::new(HashMap::new(), None);
        assert_eq!(
            tok.words("Big SALE!! Shop-now, today."),
            vec!["big", "sale", "shop", "now", "today"]
        );
        assert!(tok.words("  ...  ").is_empty());
    }

    #[test]
    fn unknown_words_are_dropped_without_oov() {
        let tok = WordIndexTokenizer::new(index(&["sale", "today"]), None);
        assert_eq!(tok.encode("Sale starts today").unwrap(), vec![1, 2]);
    }

    #[test]
    fn unknown_and_rare_words_use_oov() {
        let tok = WordIndexTokenizer::new(index(&["<OOV>", "sale", "today", "rare"]), Some(4))
            .with_oov_token("<OOV>");
        // "rare" has id 4, at the num_words limit
        assert_eq!(tok.encode("sale rare zzz today").unwrap(), vec![2, 1, 1, 3]);
        assert_eq!(tok.vocab_size(), 4);
    }

    #[test]
    fn parses_string_encoded_word_index() {
        let json = r##"{
            "class_name": "Tokenizer",
            "config": {
                "num_words": 30000,
                "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
                "lower": true,
                "split": " ",
                "char_level": false,
                "oov_token": "<OOV>",
                "document_count": 2,
                "word_index": "{\"<OOV>\": 1, \"new\": 2, \"launch\": 3}"
            }
        }"##;
        let tok = tokenizer_from_json(json).unwrap();
        assert_eq!(tok.kind(), "word_index");
        assert_eq!(tok.encode("New launch tomorrow").unwrap(), vec![2, 3, 1]);
    }

    #[test]
    fn rejects_missing_oov_entry() {
        let json = r#"{"class_name": "Tokenizer",
            "config": {"oov_token": "<OOV>", "word_index": {"a": 1}}}"#;
        assert!(WordIndexTokenizer::from_json(json).is_err());
    }

    #[test]
    fn garbage_is_a_tokenizer_error() {
        let err = tokenizer_from_json("not json").unwrap_err();
        assert!(matches!(err, ReachError::Tokenizer { .. }));
    }

    #[test]
    fn encode_failure_is_a_request_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        crate::test_utils::write_word_level_tokenizer(&path, &["hello", "world"]).unwrap();

        let tok = load_tokenizer(&path).unwrap();
        assert_eq!(tok.kind(), "huggingface");
        assert_eq!(tok.encode("hello world").unwrap(), vec![1, 2]);

        let err = tok.encode("hello stranger").unwrap_err();
        assert!(matches!(err, ReachError::Inference { .. }), "{err}");
        assert!(!err.is_fatal());
    }
}
