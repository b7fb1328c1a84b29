//! Runtime configuration from `DIACHECK_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::forest::DEFAULT_TREES;
use crate::adapters::speech::{CommandRecognizer, CommandSynthesizer, SilentSynthesizer};
use crate::ports::SpeechSynthesizer;

const DEFAULT_DATASET_PATH: &str = "data/diabetes.csv";
const DEFAULT_TTS_COMMAND: &str = "espeak";
const DEFAULT_LOG_FILE: &str = "diacheck.log";
const DEFAULT_AMBIENT_SECS: u64 = 5;

/// Where log output goes.
///
/// Logging to the terminal would corrupt the TUI's alternate screen, so
/// `Auto` picks a file when stdout is interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is a terminal.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset_path: PathBuf,
    /// Reuse the fitted model across requests
    pub cache_model: bool,
    pub trees: usize,
    /// Recognizer command line; `None` means commands are typed
    pub stt_command: Option<String>,
    pub ambient: Duration,
    /// Synthesizer command line; `off` disables speech
    pub tts_command: String,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Rejected values, logged once the subscriber is installed
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            cache_model: false,
            trees: DEFAULT_TREES,
            stt_command: None,
            ambient: Duration::from_secs(DEFAULT_AMBIENT_SECS),
            tts_command: DEFAULT_TTS_COMMAND.to_string(),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            warnings: Vec::new(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

impl Config {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut warnings = Vec::new();

        let trees = get("DIACHECK_TREES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        if trees.is_none() && get("DIACHECK_TREES").is_some() {
            warnings.push(format!(
                "Ignoring invalid DIACHECK_TREES, using {}",
                defaults.trees
            ));
        }

        let ambient = get("DIACHECK_AMBIENT_SECS").and_then(|v| v.trim().parse::<u64>().ok());
        if ambient.is_none() && get("DIACHECK_AMBIENT_SECS").is_some() {
            warnings.push(format!(
                "Ignoring invalid DIACHECK_AMBIENT_SECS, using {}",
                defaults.ambient.as_secs()
            ));
        }

        Self {
            dataset_path: get("DIACHECK_DATASET_PATH")
                .map_or(defaults.dataset_path, PathBuf::from),
            cache_model: get("DIACHECK_CACHE_MODEL").is_some_and(|v| parse_bool(&v)),
            trees: trees.unwrap_or(defaults.trees),
            stt_command: get("DIACHECK_STT_COMMAND").map(|v| v.trim().to_string()),
            ambient: ambient.map_or(defaults.ambient, Duration::from_secs),
            tts_command: get("DIACHECK_TTS_COMMAND")
                .map_or(defaults.tts_command, |v| v.trim().to_string()),
            log_mode: get("DIACHECK_LOG_MODE").map_or(LogMode::Auto, |v| LogMode::parse(&v)),
            log_file: get("DIACHECK_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            warnings,
        }
    }

    /// The configured recognizer program, if any.
    #[must_use]
    pub fn recognizer(&self) -> Option<CommandRecognizer> {
        self.stt_command
            .as_deref()
            .and_then(|cmd| CommandRecognizer::from_command_line(cmd, self.ambient))
    }

    #[must_use]
    pub fn speech_enabled(&self) -> bool {
        !self.tts_command.eq_ignore_ascii_case("off")
    }

    /// The configured synthesizer.
    #[must_use]
    pub fn synthesizer(&self) -> Box<dyn SpeechSynthesizer> {
        if !self.speech_enabled() {
            return Box::new(SilentSynthesizer);
        }
        match CommandSynthesizer::from_command_line(&self.tts_command) {
            Some(synth) => Box::new(synth),
            None => Box::new(SilentSynthesizer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.dataset_path, PathBuf::from("data/diabetes.csv"));
        assert!(!config.cache_model);
        assert_eq!(config.trees, 100);
        assert!(config.recognizer().is_none());
        assert_eq!(config.ambient, Duration::from_secs(5));
        assert!(config.speech_enabled());
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DIACHECK_DATASET_PATH", "/tmp/pima.csv"),
            ("DIACHECK_CACHE_MODEL", "yes"),
            ("DIACHECK_TREES", "25"),
            ("DIACHECK_STT_COMMAND", "vosk-listen --model en"),
            ("DIACHECK_AMBIENT_SECS", "2"),
            ("DIACHECK_TTS_COMMAND", "OFF"),
            ("DIACHECK_LOG_MODE", "stdout"),
        ]);

        assert_eq!(config.dataset_path, PathBuf::from("/tmp/pima.csv"));
        assert!(config.cache_model);
        assert_eq!(config.trees, 25);
        assert_eq!(config.ambient, Duration::from_secs(2));
        assert_eq!(
            config.recognizer().expect("Recognizer configured").program(),
            "vosk-listen"
        );
        assert!(!config.speech_enabled());
        assert_eq!(config.log_mode, LogMode::Stdout);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("DIACHECK_TREES", "0"),
            ("DIACHECK_AMBIENT_SECS", "soon"),
            ("DIACHECK_CACHE_MODEL", "maybe"),
            ("DIACHECK_STT_COMMAND", "   "),
        ]);
        assert_eq!(config.trees, 100);
        assert_eq!(config.ambient, Duration::from_secs(5));
        assert!(!config.cache_model);
        assert!(config.stt_command.is_none());
        assert_eq!(
            config.warnings,
            vec![
                "Ignoring invalid DIACHECK_TREES, using 100".to_string(),
                "Ignoring invalid DIACHECK_AMBIENT_SECS, using 5".to_string(),
            ]
        );
    }

    #[test]
    fn test_log_mode() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("FILE"), LogMode::File);
        assert_eq!(LogMode::parse("bogus"), LogMode::Auto);
    }
}
