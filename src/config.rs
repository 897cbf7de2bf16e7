//! Application-level configuration loading: round timings, roster defaults and the built-in
//! question deck shape.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BRAIN_BLAST_CONFIG_PATH";

const DEFAULT_QUESTION_DURATION_SECS: u32 = 180;
const DEFAULT_ANSWER_DURATION_SECS: u32 = 5;
const DEFAULT_TEAM_COUNT: usize = 10;
const DEFAULT_QUALIFIER_COUNT: usize = 5;
const DEFAULT_BRIEFING_SLIDES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    question_duration_secs: u32,
    answer_duration_secs: u32,
    default_team_count: usize,
    qualifier_count: usize,
    briefing_slide_count: usize,
    deck: DeckShape,
}

/// Shape of the question deck generated when the operator imports nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckShape {
    /// Number of easy questions, played first.
    pub easy_count: u32,
    /// Points of each easy question.
    pub easy_points: u32,
    /// Number of hard questions, played after the easy ones.
    pub hard_count: u32,
    /// Points of each hard question.
    pub hard_points: u32,
    /// Number of reserve questions substituted after an undo.
    pub backup_count: u32,
    /// Points of each reserve question.
    pub backup_points: u32,
    /// First identifier of the reserve questions.
    pub backup_first_id: u32,
    /// Image URL template, `{id}` is replaced by the question identifier.
    pub image_url_template: String,
}

impl Default for DeckShape {
    fn default() -> Self {
        Self {
            easy_count: 10,
            easy_points: 5,
            hard_count: 5,
            hard_points: 10,
            backup_count: 5,
            backup_points: 5,
            backup_first_id: 101,
            image_url_template: "https://picsum.photos/800/600?random={id}".into(),
        }
    }
}

impl DeckShape {
    /// Render the image URL of question `id`.
    pub fn image_url(&self, id: u32) -> String {
        self.image_url_template.replace("{id}", &id.to_string())
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        question_secs = app_config.question_duration_secs,
                        answer_secs = app_config.answer_duration_secs,
                        "loaded game configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Same configuration with other countdown lengths. Zero keeps the current value.
    pub fn with_timings(mut self, question_secs: u32, answer_secs: u32) -> Self {
        if question_secs > 0 {
            self.question_duration_secs = question_secs;
        }
        if answer_secs > 0 {
            self.answer_duration_secs = answer_secs;
        }
        self
    }

    /// Seconds a question stays open before it burns.
    pub fn question_duration_secs(&self) -> u32 {
        self.question_duration_secs
    }

    /// Seconds the active team has to answer.
    pub fn answer_duration_secs(&self) -> u32 {
        self.answer_duration_secs
    }

    /// Number of teams generated when setup arrives with an empty roster.
    pub fn default_team_count(&self) -> usize {
        self.default_team_count
    }

    /// Number of leaderboard places that qualify for the grand final.
    pub fn qualifier_count(&self) -> usize {
        self.qualifier_count
    }

    /// Number of slides in the briefing deck.
    pub fn briefing_slide_count(&self) -> usize {
        self.briefing_slide_count
    }

    /// Shape of the generated question deck.
    pub fn deck(&self) -> &DeckShape {
        &self.deck
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            question_duration_secs: DEFAULT_QUESTION_DURATION_SECS,
            answer_duration_secs: DEFAULT_ANSWER_DURATION_SECS,
            default_team_count: DEFAULT_TEAM_COUNT,
            qualifier_count: DEFAULT_QUALIFIER_COUNT,
            briefing_slide_count: DEFAULT_BRIEFING_SLIDES,
            deck: DeckShape::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
/// Every field is optional; absent ones keep their built-in value.
struct RawConfig {
    question_duration_secs: Option<u32>,
    answer_duration_secs: Option<u32>,
    default_team_count: Option<usize>,
    qualifier_count: Option<usize>,
    briefing_slide_count: Option<usize>,
    deck: Option<RawDeck>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the generated deck shape.
struct RawDeck {
    easy_count: Option<u32>,
    easy_points: Option<u32>,
    hard_count: Option<u32>,
    hard_points: Option<u32>,
    backup_count: Option<u32>,
    backup_points: Option<u32>,
    backup_first_id: Option<u32>,
    image_url_template: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        // Zero-length countdowns would never tick down to an expiry.
        Self {
            question_duration_secs: value
                .question_duration_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.question_duration_secs),
            answer_duration_secs: value
                .answer_duration_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.answer_duration_secs),
            default_team_count: value
                .default_team_count
                .filter(|count| *count > 0)
                .unwrap_or(defaults.default_team_count),
            qualifier_count: value.qualifier_count.unwrap_or(defaults.qualifier_count),
            briefing_slide_count: value
                .briefing_slide_count
                .filter(|count| *count > 0)
                .unwrap_or(defaults.briefing_slide_count),
            deck: value.deck.map(Into::into).unwrap_or(defaults.deck),
        }
    }
}

impl From<RawDeck> for DeckShape {
    fn from(value: RawDeck) -> Self {
        let defaults = DeckShape::default();
        let mut shape = Self {
            easy_count: value.easy_count.unwrap_or(defaults.easy_count),
            easy_points: value
                .easy_points
                .filter(|points| *points > 0)
                .unwrap_or(defaults.easy_points),
            hard_count: value.hard_count.unwrap_or(defaults.hard_count),
            hard_points: value
                .hard_points
                .filter(|points| *points > 0)
                .unwrap_or(defaults.hard_points),
            backup_count: value.backup_count.unwrap_or(defaults.backup_count),
            backup_points: value
                .backup_points
                .filter(|points| *points > 0)
                .unwrap_or(defaults.backup_points),
            backup_first_id: value.backup_first_id.unwrap_or(defaults.backup_first_id),
            image_url_template: value
                .image_url_template
                .unwrap_or(defaults.image_url_template),
        };
        if shape.easy_count.saturating_add(shape.hard_count) == 0 {
            warn!("configured deck has no questions; keeping the default counts");
            shape.easy_count = defaults.easy_count;
            shape.hard_count = defaults.hard_count;
        }
        shape
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
