//! Validation and lenient parsing helpers for DTOs.

use validator::ValidationError;

/// Longest team name accepted at setup.
pub const MAX_TEAM_NAME_CHARS: usize = 64;
/// Largest points value an imported question may carry.
pub const MAX_QUESTION_POINTS: u32 = 1_000;
/// Setup scores are clamped to `-MAX_INITIAL_SCORE..=MAX_INITIAL_SCORE`.
pub const MAX_INITIAL_SCORE: i32 = 1_000_000;

/// Rejects strings that are empty or only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Rejects team names longer than [`MAX_TEAM_NAME_CHARS`].
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length > MAX_TEAM_NAME_CHARS {
        let mut err = ValidationError::new("team_name_length");
        err.message = Some(
            format!("Team name must be at most {MAX_TEAM_NAME_CHARS} characters (got {length})")
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Parse a score typed into a form field: the leading integer is kept, anything else is 0.
///
/// ```ignore
/// parse_score("12abc") // 12
/// parse_score(" -7")   // -7
/// parse_score("abc")   // 0
/// ```
pub fn parse_score(raw: &str) -> i32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });
    let value = if negative { -magnitude } else { magnitude };
    clamp_score(value)
}

/// Truncate a numeric score toward zero and clamp it. NaN becomes 0.
pub fn score_from_number(value: f64) -> i32 {
    (value.trunc() as i32).clamp(-MAX_INITIAL_SCORE, MAX_INITIAL_SCORE)
}

fn clamp_score(value: i64) -> i32 {
    let bound = i64::from(MAX_INITIAL_SCORE);
    // Within the i32 range after the clamp.
    value.clamp(-bound, bound) as i32
}
