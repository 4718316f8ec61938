use std::path::PathBuf;

use quill::config::{ConfigFlags, EngineConfig, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quillrc");
    let content = r#"
# comment
--perf

--comment-marker #

--lexicon=words.txt
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.perf);
    assert_eq!(flags.comment_marker.as_deref(), Some("#"));
    assert_eq!(flags.lexicon, Some(PathBuf::from("words.txt")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quillrc");
    let content = "--perf\n--history-depth 10\n--lexicon file.txt\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "quill".to_string(),
        "--history-depth".to_string(),
        "500".to_string(),
        "--indent-unit".to_string(),
        "2".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.perf, "file flags should remain enabled");
    assert_eq!(effective.indent_unit, Some(2), "cli flags should be applied");
    assert_eq!(effective.history_depth, Some(500), "cli should override depth");
    assert_eq!(
        effective.lexicon,
        Some(PathBuf::from("file.txt")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "quill".to_string(),
        "--max-output-bytes=0".to_string(),
        "--tab-width=8".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.max_output_bytes, Some(0));
    assert_eq!(flags.tab_width, Some(8));

    let config = EngineConfig::from_flags(&flags);
    assert_eq!(config.max_output_bytes, None, "zero means unbounded");
    assert_eq!(config.indent.tab_width, 8);
}

#[test]
fn test_local_file_overrides_global_file() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".quillrc");
    std::fs::write(&global, "--comment-marker #\n--display-limit 5\n").unwrap();
    std::fs::write(&local, "--comment-marker --\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(merged.comment_marker.as_deref(), Some("--"));
    assert_eq!(merged.display_limit, Some(5));
    assert_eq!(merged, ConfigFlags {
        comment_marker: Some("--".to_string()),
        display_limit: Some(5),
        ..ConfigFlags::default()
    });
}
