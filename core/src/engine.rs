use alloc::vec::Vec;
use core::time::Duration;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> AwaitingFirstSelection
/// - AwaitingFirstSelection -> AwaitingSecondSelection
/// - AwaitingSecondSelection -> AwaitingFirstSelection
/// - AwaitingSecondSelection -> Complete
///
/// Any phase goes back to AwaitingFirstSelection when a new round is dealt. A mismatched pair keeps
/// the round in AwaitingSecondSelection with input locked until the deferred reset is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    AwaitingFirstSelection,
    AwaitingSecondSelection,
    Complete,
}

impl RoundPhase {
    pub const fn is_playing(self) -> bool {
        matches!(
            self,
            Self::AwaitingFirstSelection | Self::AwaitingSecondSelection
        )
    }

    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for RoundPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Everything that changes while a round is played, replaced wholesale on every deal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub level: Level,
    pub deck: Vec<Card>,
    pub first_selection: Option<Position>,
    pub second_selection: Option<Position>,
    pub input_locked: bool,
    pub move_count: MoveCount,
    pub score: Score,
    pub matched_pairs: PairCount,
}

impl RoundState {
    fn new(level: Level, deck: &Deck) -> Self {
        Self {
            level,
            deck: deck.deal(),
            ..Default::default()
        }
    }

    pub fn total_pairs(&self) -> PairCount {
        (self.deck.len() / 2).try_into().unwrap_or(PairCount::MAX)
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.total_pairs()
    }

    pub fn selected_count(&self) -> usize {
        self.deck
            .iter()
            .filter(|card| card.state == CardState::Selected)
            .count()
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            level: self.level,
            moves: self.move_count,
            score: self.score,
        }
    }

    fn card_mut(&mut self, position: Position) -> Option<&mut Card> {
        self.deck.get_mut(usize::from(position))
    }
}

/// Deferred turn-back of a mismatched pair, the host hands it back once `delay` has elapsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingReset {
    pub generation: RoundGeneration,
    pub positions: [Position; 2],
    pub delay: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    Flipped,
    Matched,
    Mismatched(PendingReset),
    Completed,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub const fn pending_reset(self) -> Option<PendingReset> {
        match self {
            Self::Mismatched(pending) => Some(pending),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    Applied,
    Stale,
}

impl ResetOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Single-writer state machine for one player's rounds. It renders nothing and schedules nothing,
/// every change is reported to the [`RoundObserver`] passed into each call.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    pool: SymbolPool,
    rng: SmallRng,
    preset: Option<DifficultyPreset>,
    round: RoundState,
    phase: RoundPhase,
    generation: RoundGeneration,
    pending: Option<PendingReset>,
}

impl MatchEngine {
    pub fn new(pool: SymbolPool, seed: u64) -> Self {
        Self {
            pool,
            rng: SmallRng::seed_from_u64(seed),
            preset: None,
            round: RoundState::default(),
            phase: RoundPhase::Idle,
            generation: RoundGeneration::default(),
            pending: None,
        }
    }

    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    pub fn preset(&self) -> Option<DifficultyPreset> {
        self.preset
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn generation(&self) -> RoundGeneration {
        self.generation
    }

    pub fn pending_reset(&self) -> Option<PendingReset> {
        self.pending
    }

    pub fn is_locked(&self) -> bool {
        self.round.input_locked
    }

    pub fn total_pairs(&self) -> PairCount {
        self.round.total_pairs()
    }

    pub fn card_at(&self, position: Position) -> Option<Card> {
        self.round.deck.get(usize::from(position)).copied()
    }

    /// Shuffles a fresh deck for `preset` and replaces the whole round with it.
    ///
    /// On error nothing changes, the previous round (if any) stays playable.
    pub fn start_round(
        &mut self,
        preset: DifficultyPreset,
        observer: &mut impl RoundObserver,
    ) -> Result<()> {
        let deck = build_deck(preset, &self.pool, &mut self.rng)?;
        self.deal(preset, deck, observer);
        Ok(())
    }

    /// Like [`start_round`](Self::start_round) but deals whatever `builder` produces.
    pub fn start_round_with(
        &mut self,
        builder: impl DeckBuilder,
        preset: DifficultyPreset,
        observer: &mut impl RoundObserver,
    ) -> Result<()> {
        let deck = builder.build(preset, &self.pool)?;
        if deck.pair_count() != preset.unique_pairs {
            return Err(GameError::InvalidDeck);
        }
        self.deal(preset, deck, observer);
        Ok(())
    }

    /// Deals a new round with the active preset, does nothing before the first round.
    pub fn restart(&mut self, observer: &mut impl RoundObserver) -> Result<()> {
        match self.preset {
            Some(preset) => self.start_round(preset, observer),
            None => {
                log::debug!("restart requested before any round was dealt");
                Ok(())
            }
        }
    }

    pub fn change_difficulty(
        &mut self,
        preset: DifficultyPreset,
        observer: &mut impl RoundObserver,
    ) -> Result<()> {
        self.start_round(preset, observer)
    }

    pub fn select(
        &mut self,
        position: Position,
        observer: &mut impl RoundObserver,
    ) -> SelectOutcome {
        use SelectOutcome::*;

        if !self.phase.is_playing() || self.round.input_locked {
            log::trace!("select({position}) ignored, phase {:?}", self.phase);
            return Ignored;
        }
        if self.round.first_selection == Some(position) {
            return Ignored;
        }

        let Some(card) = self.round.card_mut(position) else {
            log::trace!("select({position}) ignored, no such card");
            return Ignored;
        };
        if card.state.is_matched() {
            return Ignored;
        }

        card.state = CardState::Selected;
        observer.notify(RoundEvent::CardFlipped(position));

        match self.round.first_selection {
            None => {
                self.round.first_selection = Some(position);
                self.phase = RoundPhase::AwaitingSecondSelection;
                Flipped
            }
            Some(first) => {
                self.round.second_selection = Some(position);
                self.round.move_count = self.round.move_count.saturating_add(1);
                observer.notify(RoundEvent::MoveCountChanged(self.round.move_count));
                self.evaluate([first, position], observer)
            }
        }
    }

    /// Turns a mismatched pair back over, unless a newer round or reset has made `pending` stale.
    pub fn resolve_mismatch(
        &mut self,
        pending: PendingReset,
        observer: &mut impl RoundObserver,
    ) -> ResetOutcome {
        if pending.generation != self.generation || self.pending != Some(pending) {
            log::debug!(
                "dropping stale mismatch reset for {:?} from round {:?}, current round {:?}",
                pending.positions,
                pending.generation,
                self.generation
            );
            return ResetOutcome::Stale;
        }

        self.pending = None;
        for position in pending.positions {
            if let Some(card) = self.round.card_mut(position) {
                if card.state == CardState::Selected {
                    card.state = CardState::Hidden;
                }
            }
        }
        self.round.first_selection = None;
        self.round.second_selection = None;
        self.round.input_locked = false;
        self.phase = RoundPhase::AwaitingFirstSelection;

        observer.notify(RoundEvent::MismatchResolved(pending.positions));
        ResetOutcome::Applied
    }

    fn evaluate(
        &mut self,
        positions: [Position; 2],
        observer: &mut impl RoundObserver,
    ) -> SelectOutcome {
        let [first, second] = positions;
        let identities = (
            self.card_at(first).map(|card| card.identity),
            self.card_at(second).map(|card| card.identity),
        );

        match identities {
            (Some(a), Some(b)) if a == b => {
                for position in positions {
                    if let Some(card) = self.round.card_mut(position) {
                        card.state = CardState::Matched;
                    }
                }
                self.round.score = self.round.score.saturating_add(MATCH_POINTS);
                self.round.matched_pairs = self.round.matched_pairs.saturating_add(1);
                self.round.first_selection = None;
                self.round.second_selection = None;
                self.phase = RoundPhase::AwaitingFirstSelection;

                observer.notify(RoundEvent::CardsMatched(positions));
                observer.notify(RoundEvent::ScoreChanged(self.round.score));

                if self.round.is_complete() {
                    self.complete(observer);
                    SelectOutcome::Completed
                } else {
                    SelectOutcome::Matched
                }
            }
            _ => {
                self.round.input_locked = true;
                self.round.score = self.round.score.saturating_sub(MISMATCH_PENALTY);
                let pending = PendingReset {
                    generation: self.generation,
                    positions,
                    delay: MISMATCH_DELAY,
                };
                self.pending = Some(pending);

                observer.notify(RoundEvent::CardsMismatched(positions));
                observer.notify(RoundEvent::ScoreChanged(self.round.score));
                SelectOutcome::Mismatched(pending)
            }
        }
    }

    fn deal(&mut self, preset: DifficultyPreset, deck: Deck, observer: &mut impl RoundObserver) {
        self.generation = self.generation.next();
        self.pending = None;
        self.preset = Some(preset);
        self.round = RoundState::new(preset.level, &deck);
        self.phase = RoundPhase::AwaitingFirstSelection;

        log::debug!(
            "dealt round {:?}: {} with {} pairs",
            self.generation,
            preset.level,
            preset.unique_pairs
        );
        observer.notify(RoundEvent::DeckReady(
            self.round.deck.iter().map(Card::dealt).collect(),
        ));

        // an empty deck has nothing left to match
        if self.round.is_complete() {
            self.complete(observer);
        }
    }

    fn complete(&mut self, observer: &mut impl RoundObserver) {
        self.phase = RoundPhase::Complete;
        let summary = self.round.summary();
        log::info!(
            "round complete: {} in {} moves, score {}",
            summary.level,
            summary.moves,
            summary.score
        );
        observer.notify(RoundEvent::RoundComplete(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const A: CardIdentity = CardIdentity(0);
    const B: CardIdentity = CardIdentity(1);

    fn two_pairs() -> DifficultyPreset {
        DifficultyPreset::new(Level::Easy, 2, 2)
    }

    fn engine_with(order: [CardIdentity; 4]) -> MatchEngine {
        let pool = SymbolPool::new(["A", "B"]).unwrap();
        let mut engine = MatchEngine::new(pool, 0);
        engine
            .start_round_with(FixedDeckBuilder::new(order), two_pairs(), &mut ())
            .unwrap();
        engine
    }

    #[test]
    fn new_engine_is_idle_and_ignores_input() {
        let pool = SymbolPool::new(["A", "B"]).unwrap();
        let mut engine = MatchEngine::new(pool, 0);
        let mut events: Vec<RoundEvent> = Vec::new();

        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert_eq!(engine.select(0, &mut events), SelectOutcome::Ignored);
        assert_eq!(engine.restart(&mut events), Ok(()));
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn first_selection_flips_without_counting_a_move() {
        let mut engine = engine_with([A, B, A, B]);
        let mut events: Vec<RoundEvent> = Vec::new();

        assert_eq!(engine.select(0, &mut events), SelectOutcome::Flipped);
        assert_eq!(events, vec![RoundEvent::CardFlipped(0)]);
        assert_eq!(engine.round().move_count, 0);
        assert_eq!(engine.round().first_selection, Some(0));
        assert_eq!(engine.phase(), RoundPhase::AwaitingSecondSelection);
    }

    #[test]
    fn reselecting_first_card_is_a_no_op() {
        let mut engine = engine_with([A, B, A, B]);
        engine.select(0, &mut ());
        let before = engine.round().clone();
        let mut events: Vec<RoundEvent> = Vec::new();

        assert_eq!(engine.select(0, &mut events), SelectOutcome::Ignored);
        assert_eq!(engine.select(0, &mut events), SelectOutcome::Ignored);
        assert!(events.is_empty());
        assert_eq!(engine.round(), &before);
    }

    #[test]
    fn out_of_range_position_is_ignored() {
        let mut engine = engine_with([A, B, A, B]);
        assert_eq!(engine.select(4, &mut ()), SelectOutcome::Ignored);
        assert_eq!(engine.select(Position::MAX, &mut ()), SelectOutcome::Ignored);
        assert_eq!(engine.round().selected_count(), 0);
    }

    #[test]
    fn match_scores_and_unlocks_immediately() {
        let mut engine = engine_with([A, A, B, B]);
        let mut events: Vec<RoundEvent> = Vec::new();

        engine.select(0, &mut events);
        assert_eq!(engine.select(1, &mut events), SelectOutcome::Matched);

        assert_eq!(
            events,
            vec![
                RoundEvent::CardFlipped(0),
                RoundEvent::CardFlipped(1),
                RoundEvent::MoveCountChanged(1),
                RoundEvent::CardsMatched([0, 1]),
                RoundEvent::ScoreChanged(MATCH_POINTS),
            ]
        );
        assert!(!engine.is_locked());
        assert_eq!(engine.round().matched_pairs, 1);
        assert_eq!(engine.card_at(0).unwrap().state, CardState::Matched);
        assert_eq!(engine.card_at(1).unwrap().state, CardState::Matched);
        assert_eq!(engine.phase(), RoundPhase::AwaitingFirstSelection);
    }

    #[test]
    fn matched_cards_are_excluded_from_later_selection() {
        let mut engine = engine_with([A, A, B, B]);
        engine.select(0, &mut ());
        engine.select(1, &mut ());

        assert_eq!(engine.select(0, &mut ()), SelectOutcome::Ignored);
        assert_eq!(engine.select(2, &mut ()), SelectOutcome::Flipped);
        assert_eq!(engine.select(1, &mut ()), SelectOutcome::Ignored);
        assert_eq!(engine.round().move_count, 1);
    }

    #[test]
    fn mismatch_locks_until_reset_is_resolved() {
        let mut engine = engine_with([A, B, A, B]);
        let mut events: Vec<RoundEvent> = Vec::new();

        engine.select(0, &mut events);
        let outcome = engine.select(1, &mut events);
        let pending = outcome.pending_reset().unwrap();

        assert_eq!(pending.positions, [0, 1]);
        assert_eq!(pending.delay, MISMATCH_DELAY);
        assert!(engine.is_locked());
        assert_eq!(engine.round().score, 0);
        assert_eq!(engine.round().selected_count(), 2);
        assert_eq!(engine.select(2, &mut events), SelectOutcome::Ignored);
        assert_eq!(engine.round().move_count, 1);

        events.clear();
        assert_eq!(
            engine.resolve_mismatch(pending, &mut events),
            ResetOutcome::Applied
        );
        assert_eq!(events, vec![RoundEvent::MismatchResolved([0, 1])]);
        assert!(!engine.is_locked());
        assert_eq!(engine.round().selected_count(), 0);
        assert_eq!(engine.round().first_selection, None);
        assert_eq!(engine.round().second_selection, None);

        // a second delivery of the same timer does nothing
        assert_eq!(engine.resolve_mismatch(pending, &mut ()), ResetOutcome::Stale);
    }

    #[test]
    fn mismatch_after_match_subtracts_penalty() {
        let pool = SymbolPool::new(["A", "B", "C"]).unwrap();
        let mut engine = MatchEngine::new(pool, 0);
        let order = [A, A, B, CardIdentity(2), B, CardIdentity(2)];
        engine
            .start_round_with(
                FixedDeckBuilder::new(order),
                DifficultyPreset::new(Level::Medium, 3, 3),
                &mut (),
            )
            .unwrap();

        engine.select(0, &mut ());
        engine.select(1, &mut ());
        engine.select(2, &mut ());
        let outcome = engine.select(3, &mut ());

        assert!(matches!(outcome, SelectOutcome::Mismatched(_)));
        assert_eq!(engine.round().score, MATCH_POINTS - MISMATCH_PENALTY);
    }

    #[test]
    fn completion_reports_structured_summary_once() {
        let mut engine = engine_with([A, A, B, B]);
        let mut events: Vec<RoundEvent> = Vec::new();

        engine.select(0, &mut events);
        engine.select(1, &mut events);
        engine.select(2, &mut events);
        assert_eq!(engine.select(3, &mut events), SelectOutcome::Completed);
        assert_eq!(engine.select(3, &mut events), SelectOutcome::Ignored);

        let completions: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                RoundEvent::RoundComplete(summary) => Some(*summary),
                _ => None,
            })
            .collect();
        assert_eq!(
            completions,
            vec![RoundSummary {
                level: Level::Easy,
                moves: 2,
                score: 20
            }]
        );
        assert_eq!(engine.phase(), RoundPhase::Complete);
    }

    #[test]
    fn zero_pair_round_completes_on_deal() {
        let pool = SymbolPool::new(["A"]).unwrap();
        let mut engine = MatchEngine::new(pool, 0);
        let mut events: Vec<RoundEvent> = Vec::new();

        engine
            .start_round(DifficultyPreset::new(Level::Easy, 0, 0), &mut events)
            .unwrap();

        assert_eq!(engine.phase(), RoundPhase::Complete);
        assert_eq!(
            events,
            vec![
                RoundEvent::DeckReady(vec![]),
                RoundEvent::RoundComplete(RoundSummary {
                    level: Level::Easy,
                    moves: 0,
                    score: 0
                }),
            ]
        );
    }

    #[test]
    fn failed_start_keeps_previous_round() {
        let mut engine = engine_with([A, B, A, B]);
        engine.select(0, &mut ());
        let generation = engine.generation();

        let result = engine.change_difficulty(DifficultyPreset::hard(), &mut ());

        assert_eq!(
            result,
            Err(GameError::InsufficientSymbols {
                required: 32,
                available: 2
            })
        );
        assert_eq!(engine.generation(), generation);
        assert_eq!(engine.round().first_selection, Some(0));
    }

    #[test]
    fn restart_reshuffles_with_active_preset() {
        let mut engine = engine_with([A, B, A, B]);
        engine.select(0, &mut ());
        let mut events: Vec<RoundEvent> = Vec::new();

        engine.restart(&mut events).unwrap();

        assert_eq!(engine.preset(), Some(two_pairs()));
        assert_eq!(engine.round().move_count, 0);
        assert_eq!(engine.round().selected_count(), 0);
        assert!(matches!(events.as_slice(), [RoundEvent::DeckReady(cards)] if cards.len() == 4));
    }
}
