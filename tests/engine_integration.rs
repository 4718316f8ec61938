use std::sync::Arc;

use quill::config::EngineConfig;
use quill::engine::Engine;
use quill::error::EngineError;
use quill::lexicon::Lexicon;
use quill::transform::CaseMode;

fn engine_with(words: &[&str]) -> Engine {
    Engine::with_lexicon(
        Arc::new(Lexicon::from_words(words.iter().copied())),
        EngineConfig::default(),
    )
}

#[test]
fn test_undo_redo_round_trip() {
    let mut engine = engine_with(&["x"]);
    let checkpoints = ["draft", "draft one", "draft one two", "final"];
    for text in checkpoints {
        engine.checkpoint(text);
    }

    let mut live = "final".to_string();
    for _ in 0..3 {
        live = engine.undo(&live).map(String::from).unwrap();
    }
    assert_eq!(live, "draft");
    assert!(engine.undo(&live).is_none());

    for _ in 0..3 {
        live = engine.redo(&live).map(String::from).unwrap();
    }
    assert_eq!(live, "final");
    assert!(engine.redo(&live).is_none());
}

#[test]
fn test_dirty_flag_follows_saved_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let mut engine = engine_with(&["x"]);

    engine.checkpoint("hello");
    engine.save(&path, "hello").unwrap();
    engine.mark_clean();
    assert!(!engine.is_dirty());

    engine.checkpoint("hello world");
    assert!(engine.is_dirty());
    assert_eq!(engine.load(&path).unwrap(), "hello");
}

#[test]
fn test_completion_orders_by_length() {
    let engine = engine_with(&["abacus", "able", "tab"]);
    assert_eq!(engine.complete("ab"), vec!["able", "abacus"]);
    assert!(engine.complete("a").is_empty());
}

#[test]
fn test_suggest_finds_transposed_word() {
    let engine = engine_with(&["then", "the", "they", "tax"]);
    let suggestions = engine.suggest("teh");
    assert_eq!(suggestions.first().map(String::as_str), Some("the"));
    assert_eq!(engine.best_correction("teh").as_deref(), Some("the"));
    assert_eq!(engine.best_correction("zzzzzz"), None);
}

#[test]
fn test_search_reports_line_and_column() {
    let mut engine = engine_with(&["x"]);
    let count = engine.search("line one\nline two\nline one", "line one");
    assert_eq!(count, 2);

    let first = engine.result_at(0).unwrap().unwrap();
    assert_eq!((first.line, first.column), (1, 0));
    let second = engine.result_at(1).unwrap().unwrap();
    assert_eq!((second.line, second.column), (3, 0));
    assert_eq!(engine.result_at(2).unwrap(), None);

    assert_eq!(engine.next_result(Some(1)), Some(0));
    assert_eq!(engine.prev_result(Some(0)), Some(1));
}

#[test]
fn test_usage_errors_before_first_query() {
    let engine = engine_with(&["x"]);
    assert!(matches!(engine.result_at(0), Err(EngineError::NoSearch)));
    assert!(matches!(engine.entry_at(0), Err(EngineError::NoAnalysis)));
}

#[test]
fn test_word_frequency_ranking() {
    let mut engine = engine_with(&["x"]);
    let distinct = engine.analyze("the cat sat on the mat the cat ran");
    assert_eq!(distinct, 6);

    let ranking: Vec<(&str, usize)> = engine
        .top_words()
        .iter()
        .map(|entry| (entry.word.as_str(), entry.count))
        .collect();
    assert_eq!(
        ranking,
        vec![
            ("the", 3),
            ("cat", 2),
            ("mat", 1),
            ("on", 1),
            ("ran", 1),
            ("sat", 1)
        ]
    );
}

#[test]
fn test_line_transforms_through_engine() {
    let engine = engine_with(&["x"]);
    let text = "b\na\nc\n";

    let commented = engine.toggle_comment(text, 2).text;
    assert_eq!(commented, "b\n// a\nc\n");
    assert_eq!(engine.toggle_comment(&commented, 2).text, text);

    assert_eq!(engine.move_line_up(text, 1).text, text);
    assert_eq!(engine.move_line_down(text, 3).text, text);
    assert_eq!(engine.sort_lines(text).text, "a\nb\nc\n");
    assert_eq!(engine.duplicate_line(text, 3).text, "b\na\nc\nc\n");
    assert_eq!(
        engine.convert_case(text, 1, 2, CaseMode::Upper).text,
        "B\nA\nc\n"
    );
    assert_eq!(engine.calculate_indent("if x:\n", 2), 4);
    assert_eq!(engine.line_position(text, 3), Some(4));
}

#[test]
fn test_output_limit_truncates_at_line_boundary() {
    let config = EngineConfig {
        max_output_bytes: Some(10),
        ..EngineConfig::default()
    };
    let engine = Engine::with_lexicon(Arc::new(Lexicon::from_words(["x"])), config);
    let rewrite = engine.duplicate_line("alpha\nbeta\n", 1);
    assert!(rewrite.truncated);
    assert_eq!(rewrite.text, "alpha\n");
}

#[test]
fn test_documents_are_isolated() {
    let mut first = engine_with(&["x"]);
    first.checkpoint("a");
    first.checkpoint("b");
    first.analyze("a b");

    let mut second = first.for_new_document();
    second.checkpoint("other");
    assert!(!second.history().can_undo());
    assert!(second.entry_at(0).is_err());
    assert!(first.undo("b").is_some());
}

#[test]
fn test_initialize_with_missing_lexicon_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        lexicon_path: Some(dir.path().join("missing.txt")),
        ..EngineConfig::default()
    };
    assert!(matches!(
        Engine::initialize(config),
        Err(EngineError::LexiconLoad { .. })
    ));
}

#[test]
fn test_initialize_with_lexicon_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    std::fs::write(&path, "# custom list\nquill 1\nquilt 2\n").unwrap();
    let config = EngineConfig {
        lexicon_path: Some(path),
        ..EngineConfig::default()
    };
    let engine = Engine::initialize(config).unwrap();
    assert_eq!(engine.complete("qu"), vec!["quill", "quilt"]);
}

#[test]
fn test_initialize_defaults_to_builtin_words() {
    let engine = Engine::initialize(EngineConfig::default()).unwrap();
    let (rewrite, replaced) = engine.correct_document("Teh answer, becuase 42.");
    assert_eq!(rewrite.text, "The answer, because 42.");
    assert_eq!(replaced, 2);
}

#[test]
fn test_builtin_words_leave_plain_english_alone() {
    let engine = Engine::initialize(EngineConfig::default()).unwrap();
    let sentences = [
        "We bought milk and bread at the market yesterday, then walked home before the rain started.",
        "She said the meeting would start at nine, so please bring your notes and a pen.",
    ];
    for sentence in sentences {
        let (rewrite, replaced) = engine.correct_document(sentence);
        assert_eq!(rewrite.text, sentence);
        assert_eq!(replaced, 0);
    }
}

#[test]
fn test_builtin_words_fix_only_the_typos() {
    let engine = Engine::initialize(EngineConfig::default()).unwrap();
    let (rewrite, replaced) = engine.correct_document("I went to teh store, it was gud.");
    assert!(
        rewrite.text.starts_with("I went to the store, it was "),
        "{}",
        rewrite.text
    );
    assert!(rewrite.text.ends_with('.'));
    assert_eq!(replaced, 2);
}
