//! Quill - text engine command line.
//!
//! # Usage
//!
//! ```bash
//! quill suggest teh
//! quill correct notes.txt --write
//! quill search notes.txt "TODO"
//! quill sort notes.txt
//! quill --comment-marker '#' comment script.py --line 3
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use quill::config::{
    ConfigFlags, EngineConfig, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use quill::engine::{Engine, Rewrite};
use quill::perf;
use quill::transform::CaseMode;

/// Completion, spelling, search and line transforms for text files
#[derive(Parser, Debug)]
#[command(name = "quill", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Word list to load instead of the built-in one
    #[arg(long, value_name = "PATH", global = true)]
    lexicon: Option<PathBuf>,

    /// Snapshots kept on each undo/redo stack
    #[arg(long, value_name = "N", global = true)]
    history_depth: Option<usize>,

    /// Marker inserted by `comment`
    #[arg(long, value_name = "STR", global = true, allow_hyphen_values = true)]
    comment_marker: Option<String>,

    /// Columns added after a block opener
    #[arg(long, value_name = "N", global = true)]
    indent_unit: Option<usize>,

    /// Tab stop width used when measuring indentation
    #[arg(long, value_name = "N", global = true)]
    tab_width: Option<usize>,

    /// Characters that open an indented block
    #[arg(long, value_name = "CHARS", global = true)]
    indent_triggers: Option<String>,

    /// Largest rewrite printed or written, 0 for unbounded
    #[arg(long, value_name = "N", global = true)]
    max_output_bytes: Option<usize>,

    /// Number of words shown by `freq`
    #[arg(long, value_name = "N", global = true)]
    display_limit: Option<usize>,

    /// Log timing of expensive operations
    #[arg(long, global = true)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            lexicon: self.lexicon.clone(),
            history_depth: self.history_depth,
            comment_marker: self.comment_marker.clone(),
            indent_unit: self.indent_unit,
            tab_width: self.tab_width,
            indent_triggers: self.indent_triggers.clone(),
            max_output_bytes: self.max_output_bytes,
            display_limit: self.display_limit,
            perf: self.perf,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Words starting with a prefix
    Complete { prefix: String },
    /// Closest known words to a possibly misspelled word
    Suggest { word: String },
    /// Replace misspelled words throughout a file
    Correct {
        file: PathBuf,
        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Every occurrence of a literal query
    Search { file: PathBuf, query: String },
    /// Most frequent words
    Freq { file: PathBuf },
    /// Word, line and character counts
    Stats { file: PathBuf },
    /// Duplicate a line
    Duplicate(LineArgs),
    /// Swap a line with the one above
    MoveUp(LineArgs),
    /// Swap a line with the one below
    MoveDown(LineArgs),
    /// Comment or uncomment a line
    Comment(LineArgs),
    /// Strip trailing whitespace from every line
    Trim(FileArgs),
    /// Drop blank lines
    RemoveEmpty(FileArgs),
    /// Sort lines
    Sort(FileArgs),
    /// Change the case of a range of lines
    Case {
        #[command(flatten)]
        target: LineArgs,
        /// Last line of the range (defaults to --line)
        #[arg(long)]
        end: Option<usize>,
        #[arg(long, value_enum)]
        mode: CaseMode,
    },
    /// Indentation for a new line inserted at --line
    Indent {
        file: PathBuf,
        #[arg(long)]
        line: usize,
    },
    /// Character offset where a line starts
    Position {
        file: PathBuf,
        #[arg(long)]
        line: usize,
    },
}

#[derive(clap::Args, Debug)]
struct FileArgs {
    file: PathBuf,
    /// Write the result back instead of printing it
    #[arg(long)]
    write: bool,
}

#[derive(clap::Args, Debug)]
struct LineArgs {
    #[command(flatten)]
    target: FileArgs,
    /// One-based line number
    #[arg(long)]
    line: usize,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    perf::set_enabled(effective.perf);

    let Some(command) = cli.command else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No command given; see `quill --help`");
    };

    let mut engine =
        Engine::initialize(EngineConfig::from_flags(&effective)).context("Failed to start engine")?;
    run(&mut engine, command, cli.json)
}

fn run(engine: &mut Engine, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Complete { prefix } => print_list(&engine.complete(&prefix), json),
        Command::Suggest { word } => print_list(&engine.suggest(&word), json),
        Command::Correct { file, write } => {
            let text = engine.load(&file)?;
            let (rewrite, replaced) = engine.correct_document(&text);
            eprintln!("{replaced} word(s) corrected");
            emit_rewrite(engine, &file, write, &rewrite, json)
        }
        Command::Search { file, query } => {
            let text = engine.load(&file)?;
            engine.search(&text, &query);
            let mut hits = Vec::new();
            let mut index = engine.next_result(None);
            while let Some(idx) = index {
                if let Some(hit) = engine.result_at(idx)? {
                    hits.push(hit.clone());
                }
                index = engine.next_result(Some(idx)).filter(|&next| next != 0);
            }
            if json {
                print_json(&hits)
            } else {
                for hit in &hits {
                    println!("{}:{}:{}: {}", file.display(), hit.line, hit.column, hit.context);
                }
                Ok(())
            }
        }
        Command::Freq { file } => {
            let text = engine.load(&file)?;
            engine.analyze(&text);
            let top = engine.top_words();
            if json {
                print_json(&top)
            } else {
                for entry in top {
                    println!("{:>6}  {}", entry.count, entry.word);
                }
                Ok(())
            }
        }
        Command::Stats { file } => {
            let text = engine.load(&file)?;
            let stats = engine.stats(&text);
            if json {
                print_json(&stats)
            } else {
                println!(
                    "words: {}\nlines: {}\ncharacters: {}",
                    stats.words, stats.lines, stats.characters
                );
                Ok(())
            }
        }
        Command::Duplicate(args) => line_transform(engine, &args, json, Engine::duplicate_line),
        Command::MoveUp(args) => line_transform(engine, &args, json, Engine::move_line_up),
        Command::MoveDown(args) => line_transform(engine, &args, json, Engine::move_line_down),
        Command::Comment(args) => line_transform(engine, &args, json, Engine::toggle_comment),
        Command::Trim(args) => file_transform(engine, &args, json, Engine::trim_trailing_whitespace),
        Command::RemoveEmpty(args) => {
            file_transform(engine, &args, json, Engine::remove_empty_lines)
        }
        Command::Sort(args) => file_transform(engine, &args, json, Engine::sort_lines),
        Command::Case { target, end, mode } => {
            let text = engine.load(&target.target.file)?;
            let rewrite =
                engine.convert_case(&text, target.line, end.unwrap_or(target.line), mode);
            emit_rewrite(engine, &target.target.file, target.target.write, &rewrite, json)
        }
        Command::Indent { file, line } => {
            let text = engine.load(&file)?;
            print_value(engine.calculate_indent(&text, line), json)
        }
        Command::Position { file, line } => {
            let text = engine.load(&file)?;
            match engine.line_position(&text, line) {
                Some(offset) => print_value(offset, json),
                None => anyhow::bail!("Line {line} is outside {}", file.display()),
            }
        }
    }
}

fn line_transform(
    engine: &Engine,
    args: &LineArgs,
    json: bool,
    op: fn(&Engine, &str, usize) -> Rewrite,
) -> Result<()> {
    let text = engine.load(&args.target.file)?;
    let rewrite = op(engine, &text, args.line);
    emit_rewrite(engine, &args.target.file, args.target.write, &rewrite, json)
}

fn file_transform(
    engine: &Engine,
    args: &FileArgs,
    json: bool,
    op: fn(&Engine, &str) -> Rewrite,
) -> Result<()> {
    let text = engine.load(&args.file)?;
    let rewrite = op(engine, &text);
    emit_rewrite(engine, &args.file, args.write, &rewrite, json)
}

fn emit_rewrite(
    engine: &Engine,
    file: &Path,
    write: bool,
    rewrite: &Rewrite,
    json: bool,
) -> Result<()> {
    if rewrite.truncated {
        eprintln!("[warn] Output truncated to fit --max-output-bytes");
    }
    if write {
        if rewrite.truncated {
            anyhow::bail!("Refusing to overwrite {} with truncated text", file.display());
        }
        engine.save(file, &rewrite.text)?;
        return Ok(());
    }
    if json {
        return print_json(rewrite);
    }
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rewrite.text.as_bytes())
        .context("Failed to write output")
}

fn print_list(words: &[String], json: bool) -> Result<()> {
    if json {
        return print_json(&words);
    }
    for word in words {
        println!("{word}");
    }
    Ok(())
}

fn print_value(value: usize, json: bool) -> Result<()> {
    if json {
        return print_json(&value);
    }
    println!("{value}");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
    println!("{rendered}");
    Ok(())
}
