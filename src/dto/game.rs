use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::{
        MAX_QUESTION_POINTS, parse_score, score_from_number, validate_not_blank,
        validate_team_name,
    },
    state::{
        game::{Difficulty, Question, Team},
        questions::QuestionImport,
    },
};

/// Payload submitted from the setup screen to open a session.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct SetupRequest {
    /// Teams in roster order. Empty means the default roster.
    #[serde(default)]
    #[validate(nested)]
    pub teams: Vec<TeamInput>,
    /// Uploaded questions. Missing or empty means the generated deck.
    #[serde(default)]
    #[validate(nested)]
    pub questions: Option<Vec<QuestionInput>>,
    /// Uploaded reserve questions. Missing or empty means the generated reserve pool.
    #[serde(default)]
    #[validate(nested)]
    pub backup_questions: Option<Vec<QuestionInput>>,
    /// Shuffle the question order once before the round.
    #[serde(default)]
    pub shuffle: bool,
}

/// One roster row of the setup screen.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TeamInput {
    /// Display name; blank falls back to `Team {n}`.
    #[serde(default)]
    pub name: String,
    /// Score carried from the previous round, as a number or as typed text.
    #[serde(default)]
    pub score: Option<ScoreInput>,
}

impl Validate for TeamInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_team_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Initial score as sent by the setup form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ScoreInput {
    /// JSON number.
    Number(f64),
    /// Raw text field content.
    Text(String),
}

impl ScoreInput {
    /// Lenient integer value; anything unparseable counts as zero.
    pub fn value(&self) -> i32 {
        match self {
            ScoreInput::Number(value) => score_from_number(*value),
            ScoreInput::Text(raw) => parse_score(raw),
        }
    }
}

/// One uploaded question record.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct QuestionInput {
    /// Question number.
    pub id: u32,
    /// Points at stake; 10 or more makes the question hard.
    #[validate(range(min = 1, max = MAX_QUESTION_POINTS))]
    pub points: u32,
    /// URL of the stored image.
    #[validate(custom(function = "validate_not_blank"))]
    pub url: String,
    /// File name as uploaded.
    #[serde(default, alias = "originalName")]
    pub original_name: String,
}

impl From<QuestionInput> for QuestionImport {
    fn from(value: QuestionInput) -> Self {
        Self {
            id: value.id,
            points: value.points,
            url: value.url,
            original_name: value.original_name,
        }
    }
}

/// Team projection with its three scores.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct TeamSummary {
    pub id: String,
    pub name: String,
    pub initial_score: i32,
    pub round_score: i32,
    pub total_score: i32,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            initial_score: team.initial_score,
            round_score: team.round_score,
            total_score: team.total_score,
        }
    }
}

/// Difficulty band exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyDto {
    Easy,
    Hard,
}

impl From<Difficulty> for DifficultyDto {
    fn from(value: Difficulty) -> Self {
        match value {
            Difficulty::Easy => DifficultyDto::Easy,
            Difficulty::Hard => DifficultyDto::Hard,
        }
    }
}

/// Question projection shown on the display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionSummary {
    pub id: u32,
    pub difficulty: DifficultyDto,
    pub points: u32,
    pub image_url: String,
}

impl From<&Question> for QuestionSummary {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            difficulty: question.difficulty.into(),
            points: question.points,
            image_url: question.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_request_accepts_numeric_and_text_scores() {
        let request: SetupRequest = serde_json::from_str(
            r#"{"teams": [{"name": "A", "score": 12}, {"name": "B", "score": "7x"}, {"name": ""}]}"#,
        )
        .unwrap();

        let scores: Vec<i32> = request
            .teams
            .iter()
            .map(|team| team.score.as_ref().map_or(0, ScoreInput::value))
            .collect();
        assert_eq!(scores, vec![12, 7, 0]);
        assert!(request.validate().is_ok());
        assert!(!request.shuffle);
    }

    #[test]
    fn zero_point_question_fails_validation() {
        let request: SetupRequest = serde_json::from_str(
            r#"{"questions": [{"id": 1, "points": 0, "url": "/soal/1.png", "originalName": "1.png"}]}"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("questions"));
    }

    #[test]
    fn oversized_question_points_fail_validation() {
        let input = QuestionInput {
            id: 1,
            points: u32::MAX,
            url: "/soal/1.png".into(),
            original_name: String::new(),
        };
        assert!(input.validate().is_err());

        let capped = QuestionInput {
            points: MAX_QUESTION_POINTS,
            ..input
        };
        assert!(capped.validate().is_ok());
    }

    #[test]
    fn blank_question_url_fails_validation() {
        let input = QuestionInput {
            id: 1,
            points: 5,
            url: "  ".into(),
            original_name: String::new(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn overlong_team_name_fails_validation() {
        let request = SetupRequest {
            teams: vec![TeamInput {
                name: "x".repeat(100),
                score: None,
            }],
            ..SetupRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
