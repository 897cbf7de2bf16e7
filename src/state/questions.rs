//! Question deck: the ordered primary sequence played during a round and the small reserve
//! pool consumed when an undo burns the question on screen.

use rand::{Rng, rng, seq::SliceRandom};

use crate::{
    config::DeckShape,
    state::game::{Difficulty, Question},
};

/// One record handed over by the upload subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionImport {
    /// Question number.
    pub id: u32,
    /// Point value, drives the difficulty.
    pub points: u32,
    /// Where the stored image is served from.
    pub url: String,
    /// File name as uploaded, kept for operator logs only.
    pub original_name: String,
}

impl From<QuestionImport> for Question {
    fn from(value: QuestionImport) -> Self {
        Self {
            id: value.id,
            difficulty: Difficulty::from_points(value.points),
            points: value.points,
            image_url: value.url,
        }
    }
}

/// Questions for one session.
///
/// The primary order is fixed once the deck is built (and optionally shuffled). Reserve
/// questions are handed out at most once each, in order; `substitute` points at the reserve
/// question currently shown in place of the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDeck {
    primary: Vec<Question>,
    backups: Vec<Question>,
    backup_cursor: usize,
    substitute: Option<usize>,
}

impl QuestionDeck {
    /// Build a deck from explicit primary and reserve sequences.
    pub fn new(primary: Vec<Question>, backups: Vec<Question>) -> Self {
        Self {
            primary,
            backups,
            backup_cursor: 0,
            substitute: None,
        }
    }

    /// Build the default deck: easy questions first, then hard ones, plus the reserve pool.
    pub fn generate(shape: &DeckShape) -> Self {
        let easy = (1..=shape.easy_count).map(|id| Question {
            id,
            difficulty: Difficulty::Easy,
            points: shape.easy_points,
            image_url: shape.image_url(id),
        });
        let hard = (shape.easy_count + 1..=shape.easy_count + shape.hard_count).map(|id| Question {
            id,
            difficulty: Difficulty::Hard,
            points: shape.hard_points,
            image_url: shape.image_url(id),
        });
        let primary = easy.chain(hard).collect();

        Self::new(primary, generate_backups(shape))
    }

    /// Build a deck from uploaded records. Missing or empty sequences fall back to the
    /// generated ones.
    pub fn from_imports(
        primary: Vec<QuestionImport>,
        backups: Vec<QuestionImport>,
        shape: &DeckShape,
    ) -> Self {
        let primary: Vec<Question> = if primary.is_empty() {
            Self::generate(shape).primary
        } else {
            primary.into_iter().map(Into::into).collect()
        };
        let backups = if backups.is_empty() {
            generate_backups(shape)
        } else {
            backups.into_iter().map(Into::into).collect()
        };

        Self::new(primary, backups)
    }

    /// Shuffle the primary order with a thread-local generator.
    pub fn shuffle(&mut self) {
        let mut rng = rng();
        self.shuffle_with(&mut rng);
    }

    /// Shuffle the primary order (Fisher-Yates) with the provided generator.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.primary.shuffle(rng);
    }

    /// Number of primary questions.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Whether the deck has no primary question.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Primary questions in play order.
    pub fn primary(&self) -> &[Question] {
        &self.primary
    }

    /// Question displayed at `index`, taking a pending substitution into account.
    pub fn current(&self, index: usize) -> Option<&Question> {
        self.substitute
            .and_then(|slot| self.backups.get(slot))
            .or_else(|| self.primary.get(index))
    }

    /// Whether a reserve question is currently displayed instead of the primary one.
    pub fn is_substituted(&self) -> bool {
        self.substitute.is_some()
    }

    /// Number of reserve questions not handed out yet.
    pub fn backups_remaining(&self) -> usize {
        self.backups.len().saturating_sub(self.backup_cursor)
    }

    /// Replace the displayed question with the next unused reserve question.
    ///
    /// When the pool is exhausted the substitution is dropped and the primary question at the
    /// current index is shown again.
    pub fn substitute_next_backup(&mut self) -> Option<&Question> {
        if self.backup_cursor < self.backups.len() {
            let slot = self.backup_cursor;
            self.backup_cursor += 1;
            self.substitute = Some(slot);
            self.backups.get(slot)
        } else {
            self.substitute = None;
            None
        }
    }

    /// Return to the primary sequence; used when a new question opens.
    pub fn clear_substitution(&mut self) {
        self.substitute = None;
    }
}

fn generate_backups(shape: &DeckShape) -> Vec<Question> {
    (0..shape.backup_count)
        .map(|offset| {
            let id = shape.backup_first_id + offset;
            Question {
                id,
                difficulty: Difficulty::from_points(shape.backup_points),
                points: shape.backup_points,
                image_url: shape.image_url(id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn import(id: u32, points: u32) -> QuestionImport {
        QuestionImport {
            id,
            points,
            url: format!("/soal/soal_{id}_{points}.png"),
            original_name: format!("q-{id}-{points}.png"),
        }
    }

    #[test]
    fn default_deck_has_easy_then_hard_questions() {
        let deck = QuestionDeck::generate(&DeckShape::default());

        assert_eq!(deck.len(), 15);
        assert!(deck.primary()[..10].iter().all(|q| q.points == 5));
        assert!(deck.primary()[..10].iter().all(|q| q.difficulty == Difficulty::Easy));
        assert!(deck.primary()[10..].iter().all(|q| q.points == 10));
        assert!(deck.primary()[10..].iter().all(|q| q.difficulty == Difficulty::Hard));
        assert_eq!(deck.primary()[14].id, 15);
        assert_eq!(deck.backups_remaining(), 5);
    }

    #[test]
    fn imports_classify_difficulty_from_points() {
        let deck = QuestionDeck::from_imports(
            vec![import(1, 5), import(2, 10), import(3, 20)],
            Vec::new(),
            &DeckShape::default(),
        );

        let difficulties: Vec<_> = deck.primary().iter().map(|q| q.difficulty).collect();
        assert_eq!(
            difficulties,
            vec![Difficulty::Easy, Difficulty::Hard, Difficulty::Hard]
        );
        assert_eq!(deck.primary()[1].image_url, "/soal/soal_2_10.png");
        // Reserve pool falls back to the generated one.
        assert_eq!(deck.backups_remaining(), 5);
    }

    #[test]
    fn empty_import_falls_back_to_generated_deck() {
        let deck = QuestionDeck::from_imports(Vec::new(), vec![import(200, 5)], &DeckShape::default());
        assert_eq!(deck.len(), 15);
        assert_eq!(deck.backups_remaining(), 1);
    }

    #[test]
    fn shuffle_keeps_the_same_questions() {
        let mut deck = QuestionDeck::generate(&DeckShape::default());
        let mut before: Vec<u32> = deck.primary().iter().map(|q| q.id).collect();

        let mut rng = StdRng::seed_from_u64(7);
        deck.shuffle_with(&mut rng);

        let mut after: Vec<u32> = deck.primary().iter().map(|q| q.id).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn backups_are_consumed_once_in_order() {
        let mut deck = QuestionDeck::new(
            vec![Question::from(import(1, 5))],
            vec![Question::from(import(101, 5)), Question::from(import(102, 5))],
        );

        assert_eq!(deck.current(0).map(|q| q.id), Some(1));

        assert_eq!(deck.substitute_next_backup().map(|q| q.id), Some(101));
        assert_eq!(deck.current(0).map(|q| q.id), Some(101));

        assert_eq!(deck.substitute_next_backup().map(|q| q.id), Some(102));
        assert_eq!(deck.backups_remaining(), 0);

        // Exhausted pool: back to the primary question.
        assert!(deck.substitute_next_backup().is_none());
        assert!(!deck.is_substituted());
        assert_eq!(deck.current(0).map(|q| q.id), Some(1));
    }

    #[test]
    fn clearing_substitution_restores_primary_order() {
        let mut deck = QuestionDeck::generate(&DeckShape::default());
        deck.substitute_next_backup();
        assert_eq!(deck.current(3).map(|q| q.id), Some(101));

        deck.clear_substitution();
        assert_eq!(deck.current(3).map(|q| q.id), Some(4));
        assert_eq!(deck.backups_remaining(), 4);
    }
}
