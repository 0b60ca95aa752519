//! Building a splitter from configuration.

use std::sync::Arc;

use tracing::debug;

use textsplit_core::{ChunkingConfig, Result, SplitError, Strategy, TextSplitter, Tokenizer};

use crate::character::{CharacterSplitter, DEFAULT_SEPARATOR};
use crate::paragraph::{ParagraphSegmenter, ParagraphSplitter};
use crate::recursive::RecursiveSplitter;
use crate::sentence::{SentenceSegmenter, SentenceSplitter};
use crate::token::TokenSplitter;

/// Build the splitter selected by `config.strategy`.
///
/// `tokenizer` is needed by the token strategy and by `length = "tokens"`.
/// For the recursive strategy an explicit `separators` list takes
/// precedence over `language`.
pub fn build_splitter(
    config: &ChunkingConfig,
    tokenizer: Option<Arc<dyn Tokenizer>>,
) -> Result<Box<dyn TextSplitter>> {
    let splitter_config = config.splitter_config(tokenizer.clone())?;
    debug!(
        "Building {} splitter (size={}, overlap={}, length={})",
        config.strategy,
        splitter_config.chunk_size(),
        splitter_config.chunk_overlap(),
        splitter_config.length_measure().name()
    );

    let splitter: Box<dyn TextSplitter> = match config.strategy {
        Strategy::Character => Box::new(CharacterSplitter::with_separator(
            splitter_config,
            config.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR),
        )),
        Strategy::Recursive => match (&config.separators, &config.language) {
            (Some(separators), _) => Box::new(RecursiveSplitter::with_separators(
                splitter_config,
                separators.iter().cloned(),
            )),
            (None, Some(tag)) => {
                Box::new(RecursiveSplitter::from_language_tag(splitter_config, tag)?)
            }
            (None, None) => Box::new(RecursiveSplitter::new(splitter_config)),
        },
        Strategy::Token => {
            let tokenizer = tokenizer
                .ok_or_else(|| SplitError::config("the token strategy requires a tokenizer"))?;
            Box::new(TokenSplitter::new(splitter_config, tokenizer))
        }
        Strategy::Sentence => {
            let segmenter = match &config.abbreviations {
                Some(abbreviations) => SentenceSegmenter::with_abbreviations(abbreviations),
                None => SentenceSegmenter::new(),
            };
            Box::new(SentenceSplitter::with_segmenter(splitter_config, segmenter))
        }
        Strategy::Paragraph => {
            let segmenter = match &config.paragraph_delimiter {
                Some(pattern) => ParagraphSegmenter::with_pattern(pattern)?,
                None => ParagraphSegmenter::new(),
            };
            Box::new(ParagraphSplitter::with_segmenter(splitter_config, segmenter))
        }
    };

    Ok(splitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use textsplit_core::LengthKind;
    use textsplit_tokenize::ByteTokenizer;

    fn chunking(strategy: Strategy, chunk_size: usize) -> ChunkingConfig {
        ChunkingConfig {
            strategy,
            chunk_size,
            chunk_overlap: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_is_recursive() {
        let splitter = build_splitter(&ChunkingConfig::default(), None).unwrap();
        assert_eq!(splitter.config().chunk_size(), 1000);
        assert_eq!(splitter.config().chunk_overlap(), 200);
        assert_eq!(splitter.split_text("hello world").unwrap(), vec!["hello world"]);
    }

    #[test]
    fn test_character_separator() {
        let config = ChunkingConfig {
            separator: Some(";".to_string()),
            ..chunking(Strategy::Character, 3)
        };
        let splitter = build_splitter(&config, None).unwrap();
        assert_eq!(splitter.split_text("ab;cd;ef").unwrap(), vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_separators_take_precedence_over_language() {
        let config = ChunkingConfig {
            separators: Some(vec!["|".to_string()]),
            language: Some("klingon".to_string()),
            ..chunking(Strategy::Recursive, 3)
        };
        let splitter = build_splitter(&config, None).unwrap();
        assert_eq!(splitter.split_text("ab|cd").unwrap(), vec!["ab", "cd"]);
    }

    #[test]
    fn test_unknown_language() {
        let config = ChunkingConfig {
            language: Some("klingon".to_string()),
            ..chunking(Strategy::Recursive, 100)
        };
        let err = build_splitter(&config, None).err().unwrap();
        assert_eq!(err.error_code(), "UNSUPPORTED_LANGUAGE");
    }

    #[test]
    fn test_invalid_sizes() {
        let config = ChunkingConfig {
            chunk_overlap: 10,
            ..chunking(Strategy::Recursive, 10)
        };
        let err = build_splitter(&config, None).err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_token_strategy_requires_tokenizer() {
        let config = chunking(Strategy::Token, 4);
        assert!(build_splitter(&config, None).is_err());

        let splitter = build_splitter(&config, Some(Arc::new(ByteTokenizer::new()))).unwrap();
        assert_eq!(splitter.split_text("abcdef").unwrap(), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_token_length_measure() {
        let config = ChunkingConfig {
            length: LengthKind::Tokens,
            ..chunking(Strategy::Recursive, 4)
        };
        assert!(build_splitter(&config, None).is_err());

        let splitter = build_splitter(&config, Some(Arc::new(ByteTokenizer::new()))).unwrap();
        assert_eq!(splitter.config().length_measure().name(), "tokens");
        assert_eq!(splitter.split_text("ab cd ef").unwrap(), vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_sentence_abbreviations() {
        let config = ChunkingConfig {
            abbreviations: Some(vec!["Approx.".to_string()]),
            ..chunking(Strategy::Sentence, 15)
        };
        let splitter = build_splitter(&config, None).unwrap();
        // "Mr." is not in the custom list, so it ends a sentence here.
        assert_eq!(
            splitter.split_text("Approx. Ten. Mr. Bo.").unwrap(),
            vec!["Approx. Ten.", "Mr. Bo."]
        );
    }

    #[test]
    fn test_paragraph_delimiter() {
        let config = ChunkingConfig {
            paragraph_delimiter: Some(r"\n-+\n".to_string()),
            ..chunking(Strategy::Paragraph, 5)
        };
        let splitter = build_splitter(&config, None).unwrap();
        assert_eq!(splitter.split_text("one\n--\ntwo").unwrap(), vec!["one", "two"]);

        let config = ChunkingConfig {
            paragraph_delimiter: Some("(".to_string()),
            ..chunking(Strategy::Paragraph, 5)
        };
        assert!(build_splitter(&config, None).is_err());
    }
}
