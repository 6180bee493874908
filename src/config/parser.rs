//! Configuration file parser.
//!
//! Parses TOML-style configuration files with a custom lightweight parser.
//! Keys may be grouped under `[section]` headers or written as `section.key`.

use super::types::*;
use std::{fs, io};

/// Load configuration from a file path.
pub fn load_config(path: &str) -> io::Result<Config> {
    let s = fs::read_to_string(path)?;
    parse_config(&s)
}

/// Parse configuration from a string.
pub fn parse_config(s: &str) -> io::Result<Config> {
    let mut cfg = Config::default();
    let mut current = String::new();

    for (lineno, line) in s.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            continue;
        }
        let Some((lhs, rhs)) = line.split_once('=') else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: expected key = value", lineno + 1),
            ));
        };
        let lhs = lhs.trim();
        let val = strip_comment(rhs.trim());

        let (section, key) = match lhs.split_once('.') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (current.as_str(), lhs),
        };

        set_config_value(section, key, val, &mut cfg).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: {}", lineno + 1, e),
            )
        })?;
    }

    Ok(cfg)
}

/// Drop a trailing `# comment` unless the `#` sits inside a quoted string.
fn strip_comment(val: &str) -> &str {
    let mut in_quotes = false;
    for (i, c) in val.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return val[..i].trim_end(),
            _ => {}
        }
    }
    val
}

/// Set a configuration value based on section, key, and value strings.
fn set_config_value(section: &str, key: &str, val: &str, cfg: &mut Config) -> Result<(), String> {
    macro_rules! parse {
        (s) => {
            val.trim_matches('"').to_string()
        };
        (b) => {
            match val {
                "true" => true,
                "false" => false,
                _ => return Err(format!("bad bool {val}")),
            }
        };
        (usize_) => {
            val.parse::<usize>().map_err(|e| e.to_string())?
        };
        (f32_) => {
            val.parse::<f32>().map_err(|e| e.to_string())?
        };
    }

    match (section, key) {
        // Index section
        ("index", "docs_path") => cfg.index.docs_path = parse!(s),
        ("index", "title_boost") => cfg.index.title_boost = parse!(f32_),
        ("index", "body_boost") => cfg.index.body_boost = parse!(f32_),
        ("index", "retain_positions") => cfg.index.retain_positions = parse!(b),
        ("index", "writer_heap_bytes") => cfg.index.writer_heap_bytes = parse!(usize_),

        // Search section
        ("search", "default_limit") => cfg.search.default_limit = parse!(usize_),
        ("search", "max_limit") => cfg.search.max_limit = parse!(usize_),

        // HTTP section
        ("http", "bind_addr") => {
            cfg.http.get_or_insert_with(Http::default).bind_addr = parse!(s);
        }
        ("http", "enabled") => {
            if parse!(b) {
                cfg.http.get_or_insert_with(Http::default);
            } else {
                cfg.http = None;
            }
        }

        ("", key) => return Err(format!("key {key} outside of any section")),
        _ => return Err(format!("unknown key {section}.{key}")),
    }

    Ok(())
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &str) -> io::Result<Self> {
        load_config(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_headers() {
        let cfg = parse_config(
            r#"
# docindex settings
[index]
docs_path = "site/search.js"   # generated by the book build
title_boost = 5
retain_positions = false

[search]
default_limit = 10
"#,
        )
        .unwrap();
        assert_eq!(cfg.index.docs_path, "site/search.js");
        assert_eq!(cfg.index.title_boost, 5.0);
        assert!(!cfg.index.retain_positions);
        assert_eq!(cfg.index.body_boost, 1.0);
        assert_eq!(cfg.search.default_limit, 10);
        assert_eq!(cfg.search.max_limit, 100);
    }

    #[test]
    fn test_dotted_keys() {
        let cfg = parse_config("http.bind_addr = \"0.0.0.0:9000\"\nsearch.max_limit = 7\n").unwrap();
        assert_eq!(cfg.http.unwrap().bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.search.max_limit, 7);
    }

    #[test]
    fn test_http_disabled() {
        let cfg = parse_config("[http]\nenabled = false\n").unwrap();
        assert!(cfg.http.is_none());
    }

    #[test]
    fn test_hash_inside_quotes_kept() {
        let cfg = parse_config("[index]\ndocs_path = \"docs#1.json\" # note\n").unwrap();
        assert_eq!(cfg.index.docs_path, "docs#1.json");
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = parse_config("[index]\n\nbogus = 1\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(parse_config("[index]\nretain_positions = yes\n").is_err());
        assert!(parse_config("[search]\ndefault_limit = -1\n").is_err());
        assert!(parse_config("docs_path = \"x\"\n").is_err());
        assert!(parse_config("[index]\ndocs_path\n").is_err());
    }
}
