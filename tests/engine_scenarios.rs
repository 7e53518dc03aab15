use std::time::Duration;

use memory_match::{
    CardId, DeferredOutcome, Difficulty, GameEngine, GameStatus, Rejection, RenderDirective,
    SelectOutcome, Timings, TurnPhase, VirtualClock,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn clock(difficulty: Difficulty, seed: u64) -> (VirtualClock, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let engine = GameEngine::new(difficulty, Timings::standard(), &mut rng);
    (VirtualClock::new(engine, Vec::<RenderDirective>::new()), rng)
}

/// Card ids grouped by symbol, in order of first appearance.
fn pairs(engine: &GameEngine) -> Vec<(CardId, CardId)> {
    let mut out: Vec<(CardId, CardId)> = Vec::new();
    for card in engine.cards() {
        if out.iter().any(|&(a, _)| engine.card(a).unwrap().value == card.value) {
            continue;
        }
        let twin = engine
            .cards()
            .iter()
            .find(|c| c.id != card.id && c.value == card.value)
            .unwrap();
        out.push((card.id, twin.id));
    }
    out
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn second_pick_of_same_card_is_ignored() {
    let (mut clock, _) = clock(Difficulty::Easy, 1);
    let (a, _) = pairs(clock.engine())[0];

    assert_eq!(clock.select(a), SelectOutcome::Flipped);
    assert_eq!(
        clock.select(a),
        SelectOutcome::Rejected(Rejection::AlreadySelected)
    );
    assert_eq!(clock.engine().flipped(), &[a]);
    assert_eq!(clock.engine().moves(), 0);
    assert_eq!(clock.engine().phase(), TurnPhase::OneFlipped);
}

#[test]
fn third_card_is_rejected_without_state_change() {
    let (mut clock, _) = clock(Difficulty::Easy, 2);
    let p = pairs(clock.engine());
    clock.select(p[0].0);
    clock.select(p[1].0);

    let before = clock.engine().board_view();
    assert_eq!(
        clock.select(p[2].0),
        SelectOutcome::Rejected(Rejection::Locked)
    );
    assert_eq!(clock.engine().board_view(), before);
    assert_eq!(clock.engine().flipped().len(), 2);
}

#[test]
fn matching_pair_is_kept_and_input_unlocks_after_settle() {
    let (mut clock, _) = clock(Difficulty::Easy, 3);
    let (a, b) = pairs(clock.engine())[0];
    clock.select(a);
    assert_eq!(clock.select(b), SelectOutcome::PairFlipped);
    assert_eq!(clock.engine().phase(), TurnPhase::Evaluating);

    clock.advance(ms(999));
    assert!(!clock.engine().card(a).unwrap().is_matched);

    clock.advance(ms(1));
    for id in [a, b] {
        let card = clock.engine().card(id).unwrap();
        assert!(card.is_matched && card.is_flipped);
    }
    assert!(clock.engine().flipped().is_empty());
    assert!(clock.engine().is_locked());
    assert_eq!(clock.engine().phase(), TurnPhase::Settling);

    let (_, other) = pairs(clock.engine())[1];
    assert_eq!(
        clock.select(other),
        SelectOutcome::Rejected(Rejection::Locked)
    );

    clock.advance(ms(300));
    assert!(!clock.engine().is_locked());
    assert_eq!(clock.engine().phase(), TurnPhase::Idle);
    assert_eq!(
        clock.select(a),
        SelectOutcome::Rejected(Rejection::AlreadyMatched)
    );
}

#[test]
fn mismatched_pair_turns_back_down() {
    let (mut clock, _) = clock(Difficulty::Easy, 4);
    let p = pairs(clock.engine());
    let (a, c) = (p[0].0, p[1].0);
    clock.select(a);
    clock.select(c);
    clock.advance(ms(1000));

    for id in [a, c] {
        let card = clock.engine().card(id).unwrap();
        assert!(!card.is_flipped && !card.is_matched);
    }
    let feedback = clock
        .view()
        .iter()
        .filter(|d| matches!(d, RenderDirective::Feedback { .. }))
        .count();
    assert_eq!(feedback, 1);
    clock.run_until_settled();
    assert_eq!(clock.engine().phase(), TurnPhase::Idle);
}

#[test]
fn live_score_after_three_misses_and_ten_seconds() {
    let (mut clock, _) = clock(Difficulty::Easy, 5);
    let p = pairs(clock.engine());
    let (a, c) = (p[0].0, p[1].0);
    for _ in 0..3 {
        clock.select(a);
        clock.select(c);
        clock.run_until_settled();
    }
    assert_eq!(clock.engine().moves(), 3);
    let remaining = 10_000 - clock.now_ms();
    clock.advance(ms(remaining));

    assert_eq!(clock.engine().elapsed_seconds(), 10);
    assert_eq!(clock.engine().score(), 365);
}

#[test]
fn score_is_zero_until_first_move() {
    let (mut clock, _) = clock(Difficulty::Medium, 6);
    let (a, _) = pairs(clock.engine())[0];
    clock.select(a);
    clock.advance(ms(4000));
    assert_eq!(clock.engine().elapsed_seconds(), 4);
    assert_eq!(clock.engine().score(), 0);
}

#[test]
fn winning_in_twelve_moves_and_fifty_seconds() {
    let (mut clock, _) = clock(Difficulty::Easy, 7);
    let p = pairs(clock.engine());
    assert_eq!(p.len(), 4);

    for _ in 0..8 {
        clock.select(p[0].0);
        clock.select(p[1].0);
        clock.run_until_settled();
    }
    for &(a, b) in &p[..3] {
        clock.select(a);
        clock.select(b);
        clock.run_until_settled();
    }
    assert_eq!(clock.engine().moves(), 11);
    assert_eq!(clock.engine().status(), GameStatus::Active);

    // last pair flipped at 49.5s, evaluated at 50.5s after the 50th tick
    let wait = 49_500 - clock.now_ms();
    clock.advance(ms(wait));
    assert_eq!(clock.engine().elapsed_seconds(), 49);
    clock.select(p[3].0);
    clock.select(p[3].1);
    clock.run_until_settled();

    let engine = clock.engine();
    assert_eq!(engine.status(), GameStatus::Won);
    assert!(!engine.is_active());
    assert!(!clock.timer_armed());
    let summary = engine.summary().unwrap();
    assert_eq!(summary.moves, 12);
    assert_eq!(summary.elapsed_seconds, 50);
    assert_eq!(summary.score, 990);
    assert_eq!(engine.score(), 990);
    assert_eq!(engine.message(), "You won! Time: 00:50, Moves: 12, Score: 990");
}

#[test]
fn win_fires_once_and_freezes_the_game() {
    let (mut clock, _) = clock(Difficulty::Easy, 8);
    for (a, b) in pairs(clock.engine()) {
        clock.select(a);
        clock.select(b);
        clock.run_until_settled();
    }
    assert_eq!(clock.engine().status(), GameStatus::Won);
    let frozen = clock.engine().board_view();

    let (a, _) = pairs(clock.engine())[0];
    assert_eq!(
        clock.select(a),
        SelectOutcome::Rejected(Rejection::Finished)
    );
    clock.advance(ms(10_000));
    assert_eq!(clock.engine().board_view(), frozen);

    let wins = clock
        .view()
        .iter()
        .filter(|d| matches!(d, RenderDirective::Message(m) if !m.is_empty()))
        .count();
    assert_eq!(wins, 1);
}

#[test]
fn reset_during_evaluation_drops_the_stale_continuation() {
    let (mut clock, mut rng) = clock(Difficulty::Easy, 9);
    let (a, b) = pairs(clock.engine())[0];
    clock.select(a);
    clock.select(b);
    let old_epoch = clock.engine().epoch();

    clock.new_game(&mut rng);
    assert_eq!(clock.engine().epoch(), old_epoch + 1);
    assert_eq!(clock.pending_tasks(), 1);

    clock.advance(ms(2000));
    let engine = clock.engine();
    assert_eq!(clock.pending_tasks(), 0);
    assert!(engine.cards().iter().all(|c| !c.is_flipped && !c.is_matched));
    assert!(!engine.is_locked());
    assert_eq!(engine.moves(), 0);
    assert_eq!(engine.elapsed_seconds(), 0);
    assert_eq!(engine.status(), GameStatus::Ready);
}

#[test]
fn stale_task_reports_stale() {
    let mut rng = SmallRng::seed_from_u64(10);
    let mut engine = GameEngine::new(Difficulty::Easy, Timings::standard(), &mut rng);
    let ids: Vec<CardId> = engine.cards().iter().map(|c| c.id).collect();
    engine.select_card(ids[0]);
    engine.select_card(ids[1]);
    let task = engine
        .take_effects()
        .into_iter()
        .find_map(|e| match e {
            memory_match::Effect::Schedule(task) => Some(task),
            _ => None,
        })
        .unwrap();
    engine.start_new_game(&mut rng);
    assert_eq!(engine.run_deferred(task), DeferredOutcome::Stale);
}

#[test]
fn changing_difficulty_mid_game_resets_everything() {
    let (mut clock, mut rng) = clock(Difficulty::Easy, 11);
    let p = pairs(clock.engine());
    clock.select(p[0].0);
    clock.select(p[1].0);
    clock.run_until_settled();
    clock.advance(ms(3000));
    assert!(clock.engine().elapsed_seconds() > 0);
    assert!(clock.timer_armed());

    clock.set_difficulty(Difficulty::Hard, &mut rng);
    let engine = clock.engine();
    assert!(!clock.timer_armed());
    assert_eq!(engine.difficulty(), Difficulty::Hard);
    assert_eq!(engine.cards().len(), 24);
    assert_eq!(engine.moves(), 0);
    assert_eq!(engine.elapsed_seconds(), 0);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.status(), GameStatus::Ready);

    clock.advance(ms(5000));
    assert_eq!(clock.engine().elapsed_seconds(), 0);
}

#[test]
fn timer_waits_for_first_flip() {
    let (mut clock, _) = clock(Difficulty::Medium, 12);
    clock.advance(ms(5000));
    assert!(!clock.timer_armed());
    assert_eq!(clock.engine().elapsed_seconds(), 0);
    assert_eq!(clock.engine().status(), GameStatus::Ready);
}

#[test]
fn new_game_emits_layout_with_columns() {
    let (mut clock, mut rng) = clock(Difficulty::Hard, 13);
    clock.view_mut().clear();
    clock.new_game(&mut rng);
    let layout = clock.view().iter().find_map(|d| match d {
        RenderDirective::Board { columns, cards } => Some((*columns, cards.len())),
        _ => None,
    });
    assert_eq!(layout, Some((6, 24)));
    assert!(clock
        .view()
        .contains(&RenderDirective::Message(String::new())));
}

#[test]
fn unknown_card_is_rejected() {
    let (mut clock, _) = clock(Difficulty::Easy, 14);
    assert_eq!(
        clock.select(1000),
        SelectOutcome::Rejected(Rejection::UnknownCard)
    );
    assert_eq!(clock.engine().status(), GameStatus::Ready);
}
