//! Parsed model of a brace-delimited `"key"  "value"` settings file
//!
//! The document is an ordered list of lines. Lines shaped like a setting are
//! split into their parts; everything else is kept verbatim. Rendering an
//! unmodified document reproduces the input byte for byte.

use regex::Regex;
use std::sync::OnceLock;

fn setting_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^(?P<indent>\s*)"(?P<key>[^"]*)"(?P<sep>\s+)"(?P<value>[^"]*)"(?P<rest>.*)$"#)
            .expect("setting pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq)]
struct Setting {
    indent: String,
    key: String,
    separator: String,
    value: String,
    rest: String,
}

#[derive(Debug, Clone, PartialEq)]
enum LineKind {
    Setting(Setting),
    Passthrough(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    kind: LineKind,
    /// "\n" or "\r\n", or "" on a final line without one
    terminator: &'static str,
}

impl Line {
    fn render_into(&self, out: &mut String) {
        match &self.kind {
            LineKind::Setting(s) => {
                out.push_str(&s.indent);
                out.push('"');
                out.push_str(&s.key);
                out.push('"');
                out.push_str(&s.separator);
                out.push('"');
                out.push_str(&s.value);
                out.push('"');
                out.push_str(&s.rest);
            }
            LineKind::Passthrough(text) => out.push_str(text),
        }
        out.push_str(self.terminator);
    }

    fn setting(&self) -> Option<&Setting> {
        match &self.kind {
            LineKind::Setting(s) => Some(s),
            LineKind::Passthrough(_) => None,
        }
    }

    fn is_closing_brace(&self) -> bool {
        matches!(&self.kind, LineKind::Passthrough(text) if text.trim_start().starts_with('}'))
    }
}

/// What [`ConfigDocument::set`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    Updated,
    Inserted,
}

impl Change {
    pub fn is_change(self) -> bool {
        self != Change::Unchanged
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    lines: Vec<Line>,
}

impl ConfigDocument {
    /// Parse settings text, requiring exactly one brace-delimited block
    pub fn parse(text: &str) -> Result<Self, String> {
        let lines: Vec<Line> = text
            .split_inclusive('\n')
            .map(|raw| {
                let (content, terminator) = if let Some(content) = raw.strip_suffix("\r\n") {
                    (content, "\r\n")
                } else if let Some(content) = raw.strip_suffix('\n') {
                    (content, "\n")
                } else {
                    (raw, "")
                };
                let kind = match setting_pattern().captures(content) {
                    Some(caps) => LineKind::Setting(Setting {
                        indent: caps["indent"].to_string(),
                        key: caps["key"].to_string(),
                        separator: caps["sep"].to_string(),
                        value: caps["value"].to_string(),
                        rest: caps["rest"].to_string(),
                    }),
                    None => LineKind::Passthrough(content.to_string()),
                };
                Line { kind, terminator }
            })
            .collect();

        let count = |ch: char| {
            lines
                .iter()
                .filter_map(|l| match &l.kind {
                    LineKind::Passthrough(text) => Some(text.matches(ch).count()),
                    LineKind::Setting(_) => None,
                })
                .sum::<usize>()
        };
        let (opens, closes) = (count('{'), count('}'));
        if opens != 1 || closes != 1 {
            return Err(format!(
                "expected exactly one brace-delimited block, found {opens} '{{' and {closes} '}}'"
            ));
        }

        let doc = Self { lines };
        if doc.closing_brace_index().is_none() {
            return Err("closing brace must start its own line".to_string());
        }
        Ok(doc)
    }

    /// New document with a quoted header and the given settings, one per line
    pub fn with_settings<'a>(
        header: &str,
        settings: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Self {
        let passthrough = |text: &str| Line {
            kind: LineKind::Passthrough(text.to_string()),
            terminator: "\n",
        };

        let mut doc = Self {
            lines: vec![passthrough(&format!("\"{header}\"")), passthrough("{"), passthrough("}")],
        };
        for (key, value) in settings {
            doc.set(key, &value);
        }
        doc
    }

    /// Current value of a setting
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .filter_map(Line::setting)
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
    }

    /// Keys in document order (duplicates included)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter_map(Line::setting)
            .map(|s| s.key.as_str())
    }

    /// Set a value in place, or insert it before the closing brace
    ///
    /// Later duplicates of the key are dropped so the key appears once.
    pub fn set(&mut self, key: &str, value: &str) -> Change {
        let positions: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.setting().is_some_and(|s| s.key == key))
            .map(|(i, _)| i)
            .collect();

        let Some((&first, duplicates)) = positions.split_first() else {
            let at = self.closing_brace_index().unwrap_or(self.lines.len());
            let line = Line {
                kind: LineKind::Setting(Setting {
                    indent: "\t".to_string(),
                    key: key.to_string(),
                    separator: "\t\t".to_string(),
                    value: value.to_string(),
                    rest: String::new(),
                }),
                terminator: self.line_ending_before(at),
            };
            self.lines.insert(at, line);
            return Change::Inserted;
        };

        for &index in duplicates.iter().rev() {
            self.lines.remove(index);
        }

        let mut change = if duplicates.is_empty() {
            Change::Unchanged
        } else {
            Change::Updated
        };
        if let LineKind::Setting(setting) = &mut self.lines[first].kind
            && setting.value != value
        {
            setting.value = value.to_string();
            change = Change::Updated;
        }
        change
    }

    /// Render the document back to text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            line.render_into(&mut out);
        }
        out
    }

    /// Ending of the line before `index`, so inserted lines match the file
    fn line_ending_before(&self, index: usize) -> &'static str {
        match index.checked_sub(1).map(|i| self.lines[i].terminator) {
            Some("") | None => "\n",
            Some(ending) => ending,
        }
    }

    fn closing_brace_index(&self) -> Option<usize> {
        self.lines.iter().rposition(Line::is_closing_brace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\"video.cfg\"\n{\n\t\"Version\"\t\t\"15\"\n\t\"setting.defaultres\"\t\t\"1920\"\n\t\"setting.defaultresheight\"   \"1080\"\n\t// tuned by hand\n}\n";

    #[test]
    fn test_roundtrip_is_byte_exact() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.render(), SAMPLE);

        let crlf = SAMPLE.replace('\n', "\r\n");
        assert_eq!(ConfigDocument::parse(&crlf).unwrap().render(), crlf);

        let no_trailing_newline = SAMPLE.trim_end();
        assert_eq!(
            ConfigDocument::parse(no_trailing_newline).unwrap().render(),
            no_trailing_newline
        );
    }

    #[test]
    fn test_get_is_whitespace_tolerant() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.get("setting.defaultres"), Some("1920"));
        assert_eq!(doc.get("setting.defaultresheight"), Some("1080"));
        assert_eq!(doc.get("video.cfg"), None);
        assert_eq!(doc.get("missing"), None);
    }

    #[test]
    fn test_set_unchanged() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.set("setting.defaultres", "1920"), Change::Unchanged);
        assert_eq!(doc.render(), SAMPLE);
    }

    #[test]
    fn test_set_updates_only_the_value() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.set("setting.defaultresheight", "720"), Change::Updated);
        assert_eq!(
            doc.render(),
            SAMPLE.replace("\"setting.defaultresheight\"   \"1080\"", "\"setting.defaultresheight\"   \"720\"")
        );
    }

    #[test]
    fn test_set_inserts_before_closing_brace() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.set("setting.mat_vsync", "0"), Change::Inserted);
        assert!(
            doc.render()
                .ends_with("\t// tuned by hand\n\t\"setting.mat_vsync\"\t\t\"0\"\n}\n")
        );
        assert_eq!(doc.keys().count(), 4);
    }

    #[test]
    fn test_set_on_crlf_file_keeps_crlf() {
        let crlf = SAMPLE.replace('\n', "\r\n");
        let mut doc = ConfigDocument::parse(&crlf).unwrap();
        assert_eq!(doc.get("Version"), Some("15"));

        assert_eq!(doc.set("setting.mat_vsync", "0"), Change::Inserted);
        assert_eq!(doc.set("setting.defaultres", "1280"), Change::Updated);
        let text = doc.render();

        assert!(text.ends_with("\t// tuned by hand\r\n\t\"setting.mat_vsync\"\t\t\"0\"\r\n}\r\n"));
        assert!(text.contains("\t\"setting.defaultres\"\t\t\"1280\"\r\n"));
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());

        let mut reparsed = ConfigDocument::parse(&text).unwrap();
        assert_eq!(reparsed.set("setting.mat_vsync", "0"), Change::Unchanged);
        assert_eq!(reparsed.render(), text);
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let text = "\"video.cfg\"\n{\n\t\"a\"\t\"1\"\n\t\"b\"\t\"2\"\n\t\"a\"\t\"3\"\n}\n";
        let mut doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(doc.set("a", "1"), Change::Updated);
        assert_eq!(doc.render(), "\"video.cfg\"\n{\n\t\"a\"\t\"1\"\n\t\"b\"\t\"2\"\n}\n");
        assert_eq!(doc.set("a", "1"), Change::Unchanged);
    }

    #[test]
    fn test_parse_rejects_missing_or_extra_blocks() {
        assert!(ConfigDocument::parse("\"video.cfg\"\n\t\"a\"\t\"1\"\n").is_err());
        assert!(ConfigDocument::parse("{\n}\n{\n}\n").is_err());
        assert!(ConfigDocument::parse("{\n\t\"a\"\t\"1\" }\n").is_err());
    }

    #[test]
    fn test_with_settings() {
        let doc = ConfigDocument::with_settings(
            "video.cfg",
            [("setting.defaultres", "1920".to_string()), ("setting.fullscreen", "1".to_string())],
        );
        assert_eq!(
            doc.render(),
            "\"video.cfg\"\n{\n\t\"setting.defaultres\"\t\t\"1920\"\n\t\"setting.fullscreen\"\t\t\"1\"\n}\n"
        );
        assert!(ConfigDocument::parse(&doc.render()).is_ok());
    }
}
