//! Countdown clocks with one-second resolution and the tickets that bind a running
//! countdown task to the phase it was scheduled for.

use crate::state::state_machine::GamePhase;

/// Which of the two clocks a countdown drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Question clock, runs during [`GamePhase::QuestionDisplay`].
    Main,
    /// Answer clock, runs during [`GamePhase::TeamAnswering`].
    Answer,
}

impl TimerKind {
    /// Clock owned by `phase`, if any.
    pub fn for_phase(phase: GamePhase) -> Option<Self> {
        match phase {
            GamePhase::QuestionDisplay => Some(TimerKind::Main),
            GamePhase::TeamAnswering => Some(TimerKind::Answer),
            _ => None,
        }
    }
}

/// Identity of a scheduled countdown task.
///
/// A tick is only honoured while the engine still wants exactly this ticket; any transition
/// bumps the version, so a tick scheduled before it is recognised as stale when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket {
    /// Clock to decrement.
    pub kind: TimerKind,
    /// Phase the task was scheduled for.
    pub phase: GamePhase,
    /// State machine version at scheduling time.
    pub version: u64,
}

/// Result of decrementing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still running with this many seconds left.
    Running(u32),
    /// This tick brought the clock to zero.
    ReachedZero,
    /// Already at zero; nothing changed.
    Holding,
}

/// A countdown that never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
}

impl Countdown {
    /// Full countdown of `duration` seconds.
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the clock reached zero.
    pub fn is_elapsed(&self) -> bool {
        self.remaining == 0
    }

    /// Back to the full duration.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Decrement by one second.
    pub fn tick(&mut self) -> CountdownTick {
        if self.remaining == 0 {
            return CountdownTick::Holding;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            CountdownTick::ReachedZero
        } else {
            CountdownTick::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_reaches_zero_once_then_holds() {
        let mut clock = Countdown::new(3);
        assert_eq!(clock.tick(), CountdownTick::Running(2));
        assert_eq!(clock.tick(), CountdownTick::Running(1));
        assert_eq!(clock.tick(), CountdownTick::ReachedZero);
        assert_eq!(clock.tick(), CountdownTick::Holding);
        assert_eq!(clock.tick(), CountdownTick::Holding);
        assert_eq!(clock.remaining(), 0);
        assert!(clock.is_elapsed());
    }

    #[test]
    fn reset_restores_full_duration() {
        let mut clock = Countdown::new(5);
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.remaining(), 5);
        assert!(!clock.is_elapsed());
    }

    #[test]
    fn only_question_phases_own_a_clock() {
        assert_eq!(
            TimerKind::for_phase(GamePhase::QuestionDisplay),
            Some(TimerKind::Main)
        );
        assert_eq!(
            TimerKind::for_phase(GamePhase::TeamAnswering),
            Some(TimerKind::Answer)
        );
        assert_eq!(TimerKind::for_phase(GamePhase::Feedback), None);
        assert_eq!(TimerKind::for_phase(GamePhase::RoundOver), None);
    }
}
