use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::history::DEFAULT_DEPTH;
use crate::transform::{DEFAULT_COMMENT_MARKER, IndentRules};

/// Largest rewrite handed back across the engine boundary by default.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 4 * 1024 * 1024;

/// Number of frequency entries shown by default.
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Flags as written in an rc file or on the command line.
///
/// Unset options are `None` so sources can be layered with [`union`](Self::union).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub lexicon: Option<PathBuf>,
    pub history_depth: Option<usize>,
    pub comment_marker: Option<String>,
    pub indent_unit: Option<usize>,
    pub tab_width: Option<usize>,
    pub indent_triggers: Option<String>,
    /// `Some(0)` means unbounded.
    pub max_output_bytes: Option<usize>,
    pub display_limit: Option<usize>,
    pub perf: bool,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lexicon: other.lexicon.clone().or_else(|| self.lexicon.clone()),
            history_depth: other.history_depth.or(self.history_depth),
            comment_marker: other
                .comment_marker
                .clone()
                .or_else(|| self.comment_marker.clone()),
            indent_unit: other.indent_unit.or(self.indent_unit),
            tab_width: other.tab_width.or(self.tab_width),
            indent_triggers: other
                .indent_triggers
                .clone()
                .or_else(|| self.indent_triggers.clone()),
            max_output_bytes: other.max_output_bytes.or(self.max_output_bytes),
            display_limit: other.display_limit.or(self.display_limit),
            perf: self.perf || other.perf,
        }
    }
}

/// Resolved settings for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Lexicon file; the built-in word list is used when unset.
    pub lexicon_path: Option<PathBuf>,
    pub history_depth: usize,
    pub comment_marker: String,
    pub indent: IndentRules,
    /// `None` disables truncation.
    pub max_output_bytes: Option<usize>,
    pub display_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lexicon_path: None,
            history_depth: DEFAULT_DEPTH,
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
            indent: IndentRules::default(),
            max_output_bytes: Some(DEFAULT_MAX_OUTPUT_BYTES),
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn from_flags(flags: &ConfigFlags) -> Self {
        let defaults = Self::default();
        let indent = IndentRules {
            indent_unit: flags.indent_unit.unwrap_or(defaults.indent.indent_unit),
            tab_width: flags.tab_width.unwrap_or(defaults.indent.tab_width),
            triggers: flags
                .indent_triggers
                .as_ref()
                .map_or(defaults.indent.triggers, |chars| chars.chars().collect()),
        };
        Self {
            lexicon_path: flags.lexicon.clone(),
            history_depth: flags.history_depth.unwrap_or(defaults.history_depth),
            comment_marker: flags
                .comment_marker
                .clone()
                .unwrap_or(defaults.comment_marker),
            indent,
            max_output_bytes: match flags.max_output_bytes {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => defaults.max_output_bytes,
            },
            display_limit: flags.display_limit.unwrap_or(defaults.display_limit),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("quill").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("quill")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("quill").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("quill").join("config");
        }
    }

    PathBuf::from(".quillrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".quillrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# quill defaults (saved with --save)".to_string());
    if let Some(lexicon) = &flags.lexicon {
        lines.push(format!("--lexicon {}", lexicon.display()));
    }
    if let Some(depth) = flags.history_depth {
        lines.push(format!("--history-depth {depth}"));
    }
    if let Some(marker) = &flags.comment_marker {
        lines.push(format!("--comment-marker {marker}"));
    }
    if let Some(unit) = flags.indent_unit {
        lines.push(format!("--indent-unit {unit}"));
    }
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if let Some(triggers) = &flags.indent_triggers {
        lines.push(format!("--indent-triggers {triggers}"));
    }
    if let Some(limit) = flags.max_output_bytes {
        lines.push(format!("--max-output-bytes {limit}"));
    }
    if let Some(limit) = flags.display_limit {
        lines.push(format!("--display-limit {limit}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from `tokens`, ignoring everything else.
///
/// Options accept both `--name value` and `--name=value`.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--perf" {
            flags.perf = true;
            i += 1;
            continue;
        }

        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        if !is_option(name) {
            i += 1;
            continue;
        }
        let value = if let Some(value) = inline_value {
            Some(value)
        } else if let Some(next) = tokens.get(i + 1) {
            i += 1;
            Some(next.clone())
        } else {
            None
        };
        if let Some(value) = value {
            apply_option(&mut flags, name, &value);
        }
        i += 1;
    }
    flags
}

fn is_option(name: &str) -> bool {
    matches!(
        name,
        "--lexicon"
            | "--history-depth"
            | "--comment-marker"
            | "--indent-unit"
            | "--tab-width"
            | "--indent-triggers"
            | "--max-output-bytes"
            | "--display-limit"
    )
}

fn apply_option(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--lexicon" => flags.lexicon = Some(PathBuf::from(value)),
        "--history-depth" => flags.history_depth = value.parse().ok(),
        "--comment-marker" => flags.comment_marker = Some(value.to_string()),
        "--indent-unit" => flags.indent_unit = value.parse().ok(),
        "--tab-width" => flags.tab_width = value.parse().ok(),
        "--indent-triggers" => flags.indent_triggers = Some(value.to_string()),
        "--max-output-bytes" => flags.max_output_bytes = value.parse().ok(),
        "--display-limit" => flags.display_limit = value.parse().ok(),
        _ => {}
    }
}
