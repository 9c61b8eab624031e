//! Token counting for the tokenizer slide.
//!
//! Text is encoded with the `o200k_base` byte-pair vocabulary (GPT-4o and
//! later), and each token id is decoded on its own to label its chip. A token
//! that holds only part of a multi-byte character decodes lossily.

use std::sync::LazyLock;

use regex::Regex;
use tiktoken_rs::CoreBPE;

static ENCODER: LazyLock<Option<CoreBPE>> = LazyLock::new(|| match tiktoken_rs::o200k_base() {
    Ok(bpe) => Some(bpe),
    Err(err) => {
        tracing::warn!("Tokenizer vocabulary unavailable, splitting on word boundaries: {err:#}");
        None
    }
});

/// The byte-pair encoders' pre-split: contractions, words with their leading
/// space, numbers, punctuation runs and whitespace.
static PRE_TOKENIZER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+")
        .expect("pre-tokenizer pattern is valid")
});

/// Split `text` into the strings of its tokens, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    match ENCODER.as_ref() {
        Some(bpe) => encode(bpe, text),
        None => pre_split(text).map(str::to_string).collect(),
    }
}

pub fn count(text: &str) -> usize {
    match ENCODER.as_ref() {
        Some(bpe) => bpe.encode_ordinary(text).len(),
        None => pre_split(text).count(),
    }
}

/// "1 token", "12 tokens"
pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 token".to_string()
    } else {
        format!("{n} tokens")
    }
}

fn encode(bpe: &CoreBPE, text: &str) -> Vec<String> {
    bpe.encode_ordinary(text)
        .into_iter()
        .map(|rank| match bpe.decode_bytes(&[rank]) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => char::REPLACEMENT_CHARACTER.to_string(),
        })
        .collect()
}

fn pre_split(text: &str) -> impl Iterator<Item = &str> {
    PRE_TOKENIZER.find_iter(text).map(|m| m.as_str())
}
