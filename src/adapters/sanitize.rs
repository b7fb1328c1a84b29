//! Log sanitization for health measurements.
//!
//! Every formatted log line passes through [`SanitizingMakeWriter`], which
//! redacts anything that looks like a submitted measurement:
//! - `field=value` / `field: value` pairs for the eight health fields
//! - bracketed feature vectors (`features=[...]`, `FeatureVector([...])`)
//!
//! Call sites already avoid logging measurements ([`crate::domain::HealthRecord`]
//! redacts itself in `Debug`), so this catches what slips through.
//!
//! Inputs are capped at `DIACHECK_SANITIZE_MAX_BYTES` (default 16 KiB).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static HEALTH_PATTERNS: OnceLock<Option<HealthPatterns>> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

const MAX_BYTES_ENV: &str = "DIACHECK_SANITIZE_MAX_BYTES";

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct HealthPatterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

// Field names as they appear in struct Debug output, CSV headers and form labels
const RULES: [(&str, &str); 2] = [
    (
        r"(?i)\b(?:features|feature_vector|featurevector)\s*[:=(]?\s*\(?\[[^\]]{0,512}\]\)?",
        "features=[REDACTED]",
    ),
    (
        r"(?i)\b(pregnancies|glucose|blood_?pressure|skin_?thickness|insulin|bmi|diabetes_?pedigree_?function|dpf|age)\b(\s*[:=]\s*)-?[0-9]+(?:\.[0-9]+)?",
        "$1$2[REDACTED]",
    ),
];

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var(MAX_BYTES_ENV)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

/// Compile each rule once and build the set from the same regexes, so set
/// indices always line up with `rules`.
fn compile(rules: &[(&str, &'static str)]) -> Result<HealthPatterns, regex::Error> {
    let rules = rules
        .iter()
        .map(|&(pattern, replacement)| {
            Regex::new(pattern).map(|regex| Rule { regex, replacement })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let set = RegexSet::new(rules.iter().map(|rule| rule.regex.as_str()))?;
    Ok(HealthPatterns { set, rules })
}

/// `None` only if a built-in pattern fails to compile; callers then drop
/// the text rather than pass it through unredacted.
fn patterns() -> Option<&'static HealthPatterns> {
    HEALTH_PATTERNS
        .get_or_init(|| compile(&RULES).ok())
        .as_ref()
}

/// Redact health measurements from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let Some(patterns) = patterns() else {
        let newline = if input.ends_with('\n') { "\n" } else { "" };
        return format!("[REDACTED]{newline}");
    };
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        let body_len = result.trim_end_matches('\n').len();
        result.truncate(body_len);
        result.push_str(" [TRUNCATED]");
        if input.ends_with('\n') {
            result.push('\n');
        }
    }
    result
}

/// `MakeWriter` wrapper that sanitizes each formatted line before it reaches
/// the inner sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let sanitized = sanitize(&String::from_utf8_lossy(bytes));
        self.inner.write_all(sanitized.as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter that never emits a newline must not grow the buffer forever
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n[TRUNCATED]\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_redacts_field_pairs() {
        let sanitized = sanitize("submitted glucose=148 bmi: 33.6 Age=50");
        assert_eq!(
            sanitized,
            "submitted glucose=[REDACTED] bmi: [REDACTED] Age=[REDACTED]"
        );
    }

    #[test]
    fn test_redacts_debug_struct_fields() {
        let sanitized = sanitize("HealthInput { pregnancies: 3, blood_pressure: 70, diabetes_pedigree_function: 0.47 }");
        assert!(!sanitized.contains(": 3"));
        assert!(!sanitized.contains("70"));
        assert!(!sanitized.contains("0.47"));
        assert!(sanitized.contains("pregnancies: [REDACTED]"));
    }

    #[test]
    fn test_redacts_feature_vectors() {
        let sanitized = sanitize("predict features=[3.0, 120.0, 70.0, 20.0, 79.0, 20.0, 0.47, 33.0] done");
        assert_eq!(sanitized, "predict features=[REDACTED] done");

        let sanitized = sanitize("FeatureVector([1.0, 2.0])");
        assert!(!sanitized.contains("2.0"));
    }

    #[test]
    fn test_leaves_ordinary_lines_alone() {
        let line = "Checkup complete: NOT HEALTHY, accuracy 80.00% (train 40, test 10)";
        assert_eq!(sanitize(line), line);
        assert_eq!(sanitize("insulin=79"), "insulin=[REDACTED]");
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("glucose=148 and a long tail of text", 12);
        assert!(sanitized.ends_with("[TRUNCATED]"));
        assert!(!sanitized.contains("148"));
    }

    #[test]
    fn test_truncated_line_keeps_newline() {
        let line = format!("{}\n", "x".repeat(40));
        let sanitized = sanitize_with_limit(&line, 16);
        assert_eq!(sanitized, format!("{} [TRUNCATED]\n", "x".repeat(16)));

        let sanitized = sanitize_with_limit("no newline here at all", 8);
        assert_eq!(sanitized, "no newli [TRUNCATED]");
    }

    #[test]
    fn test_rule_set_lines_up_with_rules() {
        let patterns = compile(&RULES).expect("Built-in rules compile");
        assert_eq!(patterns.set.len(), patterns.rules.len());
        for (idx, rule) in patterns.rules.iter().enumerate() {
            assert_eq!(patterns.set.patterns()[idx], rule.regex.as_str());
        }

        assert!(compile(&[("glucose=", "x"), ("(unclosed", "y")]).is_err());
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let capture = Capture::default();
        let sink = capture.clone();
        let make = SanitizingMakeWriter::new(move || sink.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"first glucose=1").expect("write");
            writer.write_all(b"48\nsecond line\n").expect("write");
            writer.write_all(b"tail bmi=30").expect("write");
        }

        let output = String::from_utf8(capture.0.lock().expect("lock").clone()).expect("utf8");
        assert_eq!(
            output,
            "first glucose=[REDACTED]\nsecond line\ntail bmi=[REDACTED]"
        );
    }

    #[test]
    fn test_writer_keeps_records_apart_after_truncation() {
        let capture = Capture::default();
        let sink = capture.clone();
        let make = SanitizingMakeWriter::new(move || sink.clone());
        let long = format!("{}\n", "y".repeat(DEFAULT_SANITIZE_MAX_BYTES + 10));
        {
            let mut writer = make.make_writer();
            writer.write_all(long.as_bytes()).expect("write");
            writer.write_all(b"next record\n").expect("write");
        }

        let output = String::from_utf8(capture.0.lock().expect("lock").clone()).expect("utf8");
        assert!(output.ends_with(" [TRUNCATED]\nnext record\n"));
    }
}
