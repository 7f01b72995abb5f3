//! Invocation event files produced by a source analyzer
//!
//! Three formats are accepted, picked by file extension:
//!
//! - `.json`: an array of `{ "caller": "...", "callee": "..." }` objects
//! - `.parquet`: `caller` and `callee` string columns
//! - anything else: one event per line, written `Caller,Callee` or
//!   `Caller -> Callee`. Blank lines and `#` comments are skipped, as is a
//!   leading `caller,callee` header.

use crate::coupling::{ClassId, InvocationEvent};
use crate::data::parquet;
use crate::error::{AnalyzerError, AnalyzerResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Event file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    Text,
    Json,
    Parquet,
}

impl EventFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => EventFormat::Json,
            Some("parquet") => EventFormat::Parquet,
            _ => EventFormat::Text,
        }
    }
}

/// Load all invocation events from `path`
pub fn load_events(path: impl AsRef<Path>) -> AnalyzerResult<Vec<InvocationEvent>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalyzerError::FileNotFound(path.to_path_buf()));
    }

    let format = EventFormat::from_path(path);
    log::info!("Reading {:?} events from {}", format, path.display());

    let events = match format {
        EventFormat::Parquet => parquet::load_invocation_events(path)?,
        EventFormat::Json => {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader)?
        }
        EventFormat::Text => parse_text_events(BufReader::new(File::open(path)?))?,
    };

    log::info!("Loaded {} invocation events", events.len());
    Ok(events)
}

/// Split one event line into `(caller, callee)`
fn split_event_line(line: &str) -> Option<(&str, &str)> {
    let (caller, callee) = match line.split_once("->") {
        Some(parts) => parts,
        None => line.split_once(',')?,
    };
    let (caller, callee) = (caller.trim(), callee.trim());

    if caller.is_empty() || callee.is_empty() || callee.contains(',') || callee.contains("->") {
        return None;
    }
    Some((caller, callee))
}

fn is_header(line: &str) -> bool {
    line.replace(' ', "").eq_ignore_ascii_case("caller,callee")
}

/// Parse the line-oriented text format
pub fn parse_text_events<R: BufRead>(reader: R) -> AnalyzerResult<Vec<InvocationEvent>> {
    let mut events = Vec::new();
    let mut seen_content = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !seen_content && is_header(trimmed) {
            seen_content = true;
            continue;
        }
        seen_content = true;

        let (caller, callee) = split_event_line(trimmed).ok_or_else(|| AnalyzerError::MalformedEvent {
            line: idx + 1,
            content: trimmed.to_string(),
        })?;
        events.push(InvocationEvent::new(caller, callee));
    }

    Ok(events)
}

/// Load a project class list: one class name per line, `#` comments allowed
pub fn load_class_list(path: impl AsRef<Path>) -> AnalyzerResult<HashSet<ClassId>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalyzerError::FileNotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    let mut classes = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() && !name.starts_with('#') {
            classes.insert(ClassId::from(name));
        }
    }

    log::info!("Loaded {} project classes from {}", classes.len(), path.display());
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    #[test]
    fn test_parses_both_line_styles() {
        let input = "# extracted by analyzer\nParser -> Lexer\n\nParser, Token\n";
        let events = parse_text_events(Cursor::new(input)).unwrap();
        assert_eq!(
            events,
            vec![
                InvocationEvent::new("Parser", "Lexer"),
                InvocationEvent::new("Parser", "Token"),
            ]
        );
    }

    #[test]
    fn test_skips_leading_header() {
        let input = "caller,callee\nA,B\n";
        let events = parse_text_events(Cursor::new(input)).unwrap();
        assert_eq!(events, vec![InvocationEvent::new("A", "B")]);
    }

    #[test]
    fn test_keeps_self_invocations_for_aggregator() {
        let events = parse_text_events(Cursor::new("A,A\n")).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_self_invocation());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "A,B\nonly-one-class\n";
        let err = parse_text_events(Cursor::new(input)).unwrap_err();
        match err {
            AnalyzerError::MalformedEvent { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "only-one-class");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_extra_fields_and_blank_names() {
        assert!(parse_text_events(Cursor::new("A,B,C\n")).is_err());
        assert!(parse_text_events(Cursor::new(" -> B\n")).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(EventFormat::from_path(Path::new("e.JSON")), EventFormat::Json);
        assert_eq!(EventFormat::from_path(Path::new("e.parquet")), EventFormat::Parquet);
        assert_eq!(EventFormat::from_path(Path::new("e.csv")), EventFormat::Text);
        assert_eq!(EventFormat::from_path(Path::new("events")), EventFormat::Text);
    }

    #[test]
    fn test_loads_json_events() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"[{"caller": "A", "callee": "B"}, {"caller": "B", "callee": "C"}]"#,
        )
        .unwrap();

        let events = load_events(&path).unwrap();
        assert_eq!(events[1], InvocationEvent::new("B", "C"));
    }

    #[test]
    fn test_missing_event_file() {
        let err = load_events("/nonexistent/events.txt").unwrap_err();
        assert!(matches!(err, AnalyzerError::FileNotFound(_)));
    }

    #[test]
    fn test_loads_class_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("classes.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "# project classes\nParser\n\nLexer").unwrap();

        let classes = load_class_list(&path).unwrap();
        assert_eq!(classes.len(), 2);
        assert!(classes.contains("Parser"));
    }
}
