//! Admin console keyboard shortcuts, named after `KeyboardEvent.key` values.

use crate::state::{engine::OperatorCommand, game::Verdict};

/// Number of buzzer slots reachable from the digit row.
pub const BUZZER_SLOTS: usize = 10;

/// Command bound to `key`, or `None` for keys without a binding.
///
/// Digits `1`-`9` buzz roster slots 1-9 and `0` buzzes slot 10. Letters are case-insensitive.
pub fn command_for_key(key: &str) -> Option<OperatorCommand> {
    if let Some(position) = buzzer_slot(key) {
        return Some(OperatorCommand::Buzz {
            team_id: format!("team-{position}"),
        });
    }

    let command = match key {
        "Escape" | "Esc" => OperatorCommand::AbortRound,
        "Enter" | "ArrowRight" | " " | "Spacebar" => OperatorCommand::NextSlide,
        "ArrowLeft" | "Backspace" => OperatorCommand::PreviousSlide,
        letter if letter.chars().count() == 1 => match letter.to_ascii_lowercase().as_str() {
            "b" => OperatorCommand::Verdict(Verdict::Correct),
            "s" => OperatorCommand::Verdict(Verdict::Wrong),
            "t" => OperatorCommand::Verdict(Verdict::Timeout),
            "l" => OperatorCommand::NextQuestion,
            "u" => OperatorCommand::Undo,
            "q" => OperatorCommand::StartRound,
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

/// 0-based roster position bound to a digit key.
fn buzzer_slot(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    let position = if digit == 0 { BUZZER_SLOTS - 1 } else { digit as usize - 1 };
    Some(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buzz(team_id: &str) -> Option<OperatorCommand> {
        Some(OperatorCommand::Buzz {
            team_id: team_id.into(),
        })
    }

    #[test]
    fn digit_row_maps_to_roster_slots() {
        assert_eq!(command_for_key("1"), buzz("team-0"));
        assert_eq!(command_for_key("9"), buzz("team-8"));
        assert_eq!(command_for_key("0"), buzz("team-9"));
        assert_eq!(command_for_key("10"), None);
    }

    #[test]
    fn verdict_letters_ignore_case() {
        for key in ["b", "B"] {
            assert_eq!(
                command_for_key(key),
                Some(OperatorCommand::Verdict(Verdict::Correct))
            );
        }
        assert_eq!(
            command_for_key("S"),
            Some(OperatorCommand::Verdict(Verdict::Wrong))
        );
        assert_eq!(
            command_for_key("t"),
            Some(OperatorCommand::Verdict(Verdict::Timeout))
        );
    }

    #[test]
    fn flow_keys() {
        assert_eq!(command_for_key("l"), Some(OperatorCommand::NextQuestion));
        assert_eq!(command_for_key("U"), Some(OperatorCommand::Undo));
        assert_eq!(command_for_key("q"), Some(OperatorCommand::StartRound));
        assert_eq!(command_for_key("Escape"), Some(OperatorCommand::AbortRound));
    }

    #[test]
    fn briefing_navigation_keys() {
        for key in ["Enter", " ", "ArrowRight"] {
            assert_eq!(command_for_key(key), Some(OperatorCommand::NextSlide));
        }
        for key in ["ArrowLeft", "Backspace"] {
            assert_eq!(command_for_key(key), Some(OperatorCommand::PreviousSlide));
        }
    }

    #[test]
    fn unbound_keys_are_ignored() {
        for key in ["x", "Shift", "F5", "", "é"] {
            assert_eq!(command_for_key(key), None, "{key:?}");
        }
    }
}
