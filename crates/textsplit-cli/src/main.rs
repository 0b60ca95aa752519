//! textsplit CLI - Split files into size-bounded chunks.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use textsplit_chunk::{build_splitter, DocumentMapper, Language};
use textsplit_core::{Document, LengthKind, Strategy, TextsplitConfig, Tokenizer};
use textsplit_tokenize::{ByteTokenizer, HfTokenizer};

/// textsplit - Split text into overlapping, size-bounded chunks
#[derive(Parser)]
#[command(name = "textsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/textsplit/config.toml or ./textsplit.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into chunks
    Split {
        /// File to split
        path: PathBuf,

        /// Splitting strategy (character, recursive, token, sentence, paragraph)
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Maximum chunk size
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Overlap between consecutive chunks
        #[arg(long)]
        chunk_overlap: Option<usize>,

        /// Length measure (chars, bytes, words, tokens)
        #[arg(long)]
        length: Option<LengthKind>,

        /// Language separator table (detected from the file extension if omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Separator for the character strategy
        #[arg(long)]
        separator: Option<String>,

        /// Keep separators attached to the following chunk
        #[arg(long)]
        keep_separator: bool,

        /// HuggingFace tokenizer.json (byte-level tokens if omitted)
        #[arg(long)]
        tokenizer: Option<PathBuf>,

        /// Header prefixed to every chunk
        #[arg(long)]
        chunk_header: Option<String>,

        /// Header prefixed to continuation chunks
        #[arg(long)]
        overlap_header: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List languages with built-in separator tables
    Languages,

    /// List splitting strategies
    Strategies,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Languages => {
            for language in Language::ALL {
                println!("{}", language);
            }
        }
        Commands::Strategies => {
            for strategy in Strategy::ALL {
                println!("{}", strategy);
            }
        }
        command @ Commands::Split { .. } => {
            let config = load_config(cli.config.as_deref())?;
            split(config, command)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<TextsplitConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => TextsplitConfig::load(path)?,
        None => TextsplitConfig::load_default()?,
    };
    Ok(config)
}

/// Fold command-line flags over the loaded configuration.
fn apply_overrides(mut config: TextsplitConfig, command: &Commands) -> TextsplitConfig {
    let Commands::Split {
        path,
        strategy,
        chunk_size,
        chunk_overlap,
        length,
        language,
        separator,
        keep_separator,
        chunk_header,
        overlap_header,
        ..
    } = command
    else {
        return config;
    };

    let chunking = &mut config.chunking;
    if let Some(strategy) = strategy {
        chunking.strategy = *strategy;
    }
    if let Some(size) = chunk_size {
        chunking.chunk_size = *size;
    }
    if let Some(overlap) = chunk_overlap {
        chunking.chunk_overlap = *overlap;
    }
    if let Some(length) = length {
        chunking.length = *length;
    }
    if let Some(separator) = separator {
        chunking.separator = Some(separator.clone());
    }
    if *keep_separator {
        chunking.keep_separator = true;
    }
    if language.is_some() {
        chunking.language = language.clone();
    } else if chunking.language.is_none() && chunking.separators.is_none() {
        chunking.language = path
            .to_str()
            .and_then(Language::from_path)
            .map(|lang| lang.tag().to_string());
    }

    let document = &mut config.document;
    if chunk_header.is_some() {
        document.chunk_header = chunk_header.clone();
    }
    if overlap_header.is_some() {
        document.chunk_overlap_header = overlap_header.clone();
        document.append_chunk_overlap_header = true;
    }

    config
}

fn load_tokenizer(
    config: &TextsplitConfig,
    path: Option<&Path>,
) -> Result<Option<Arc<dyn Tokenizer>>, Box<dyn std::error::Error>> {
    let needs_tokenizer = config.chunking.strategy == Strategy::Token
        || config.chunking.length == LengthKind::Tokens;

    let tokenizer: Option<Arc<dyn Tokenizer>> = match path {
        Some(path) => Some(Arc::new(HfTokenizer::from_file(path)?)),
        None if needs_tokenizer => {
            debug!("No tokenizer given, using byte-level tokens");
            Some(Arc::new(ByteTokenizer::new()))
        }
        None => None,
    };
    Ok(tokenizer)
}

fn split(config: TextsplitConfig, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let config = apply_overrides(config, &command);
    let Commands::Split {
        path,
        tokenizer,
        format,
        ..
    } = command
    else {
        return Ok(());
    };

    let tokenizer = load_tokenizer(&config, tokenizer.as_deref())?;
    let splitter = build_splitter(&config.chunking, tokenizer)?;

    let content = fs::read_to_string(&path)?;
    let output = splitter.split_text_with_diagnostics(&content)?;

    let mut metadata = HashMap::new();
    metadata.insert(
        "source".to_string(),
        serde_json::Value::String(path.display().to_string()),
    );
    let mapper = DocumentMapper::from_config(splitter.as_ref(), &config.document);
    let documents = mapper.map_chunks(&content, &output.chunks, &metadata);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }
        OutputFormat::Text => print_text(&documents),
    }

    if output.has_oversize() {
        eprintln!(
            "{} chunk(s) exceed chunk_size {}",
            output.diagnostics.len(),
            splitter.config().chunk_size()
        );
    }

    Ok(())
}

fn print_text(documents: &[Document]) {
    for (i, doc) in documents.iter().enumerate() {
        match doc.line_range() {
            Some((from, to)) => println!("--- chunk {} (lines {}-{}) ---", i + 1, from, to),
            None => println!("--- chunk {} ---", i + 1),
        }
        println!("{}", doc.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_flags_override_config() {
        let command = parse(&[
            "textsplit",
            "split",
            "notes.txt",
            "--strategy",
            "sentence",
            "--chunk-size",
            "50",
            "--chunk-overlap",
            "5",
            "--length",
            "words",
        ]);
        let config = apply_overrides(TextsplitConfig::default(), &command);

        assert_eq!(config.chunking.strategy, Strategy::Sentence);
        assert_eq!(config.chunking.chunk_size, 50);
        assert_eq!(config.chunking.chunk_overlap, 5);
        assert_eq!(config.chunking.length, LengthKind::Words);
        assert!(config.chunking.language.is_none());
    }

    #[test]
    fn test_language_detected_from_extension() {
        let command = parse(&["textsplit", "split", "src/lib.rs"]);
        let config = apply_overrides(TextsplitConfig::default(), &command);
        assert_eq!(config.chunking.language.as_deref(), Some("rust"));

        let command = parse(&["textsplit", "split", "src/lib.rs", "--language", "markdown"]);
        let config = apply_overrides(TextsplitConfig::default(), &command);
        assert_eq!(config.chunking.language.as_deref(), Some("markdown"));
    }

    #[test]
    fn test_overlap_header_enables_append() {
        let command = parse(&[
            "textsplit",
            "split",
            "a.txt",
            "--chunk-header",
            "Doc: ",
            "--overlap-header",
            "(more) ",
        ]);
        let config = apply_overrides(TextsplitConfig::default(), &command);

        assert_eq!(config.document.chunk_header.as_deref(), Some("Doc: "));
        assert!(config.document.append_chunk_overlap_header);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = Cli::try_parse_from(["textsplit", "split", "a.txt", "--strategy", "semantic"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_strategy_gets_byte_tokenizer() {
        let command = parse(&["textsplit", "split", "a.txt", "--strategy", "token"]);
        let config = apply_overrides(TextsplitConfig::default(), &command);
        assert!(load_tokenizer(&config, None).unwrap().is_some());
        assert!(load_tokenizer(&TextsplitConfig::default(), None).unwrap().is_none());
    }
}
