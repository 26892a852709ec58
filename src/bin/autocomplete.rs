//! Loads a word list into a [`CompactTrie`] and answers prefix queries.
//!
//! Run with: cargo run --bin autocomplete -- words.txt -p be -p st
//!
//! Without `-p`, prefixes are read from stdin one per line until `quit`.
//! Blank lines are skipped; pass `-p ""` to list every word.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use compact_trie::CompactTrie;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Prefix completion over a word list.
#[derive(Parser, Debug)]
#[command(version, about = "Prefix completion over a word list.")]
struct Cli {
    /// File of whitespace-separated words to index.
    #[arg(name = "WORDS_FILE")]
    words: PathBuf,

    /// Prefix to complete. Repeatable; without it prefixes are read from stdin.
    #[arg(short, long)]
    prefix: Vec<String>,

    /// Print the trie structure after loading.
    #[arg(long)]
    tree: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("compact_trie={level},autocomplete={level}"))),
        )
        .with_writer(io::stderr)
        .init();

    let trie = load(&cli.words)?;
    info!(
        words = trie.len(),
        nodes = trie.node_count(),
        bytes = trie.memory_usage(),
        "index built"
    );

    run(&cli, &trie, io::stdin().lock(), &mut io::stdout().lock())
}

/// Answers `--prefix` arguments, or prefixes read line by line from `input`
/// until EOF or a `quit` line. Blank lines are ignored.
fn run(cli: &Cli, trie: &CompactTrie, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    if cli.tree {
        write!(out, "{trie}")?;
    }

    if !cli.prefix.is_empty() {
        for prefix in &cli.prefix {
            report(out, trie, prefix)?;
        }
        return Ok(());
    }

    for line in input.lines() {
        let line = line.context("reading prefix from stdin")?;
        match line.trim() {
            "" => continue,
            "quit" => break,
            _ => report(out, trie, &line)?,
        }
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<CompactTrie> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading word list {}", path.display()))?;
    Ok(index_words(&text))
}

/// Indexes every whitespace-separated word, skipping duplicates and words the
/// trie refuses.
fn index_words(text: &str) -> CompactTrie {
    let mut trie = CompactTrie::new();
    for word in text.split_whitespace() {
        match trie.insert(word) {
            Ok(true) => {}
            Ok(false) => debug!(word, "duplicate word skipped"),
            Err(err) => warn!(word = %word.chars().take(32).collect::<String>(), %err, "word skipped"),
        }
    }
    trie
}

fn report(out: &mut impl Write, trie: &CompactTrie, prefix: &str) -> io::Result<()> {
    let mut words = trie.query(prefix);
    if words.is_empty() {
        return writeln!(out, "no completions for {:?}", prefix.trim());
    }
    words.sort_unstable();
    writeln!(out, "completions for {:?}: {}", prefix.trim(), words.join(", "))
}
