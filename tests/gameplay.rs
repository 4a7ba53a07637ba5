use glam::Vec2;
use no_more_bubbles::consts::NOMINAL_FRAME_DT;
use no_more_bubbles::sim::{GameEvent, RoundPhase, Snapshot, distance};
use no_more_bubbles::{Game, HighScores, Tuning};

const AIMS: [Vec2; 8] = [
    Vec2::new(40.0, 400.0),
    Vec2::new(-250.0, 300.0),
    Vec2::new(300.0, 120.0),
    Vec2::new(-20.0, 900.0),
    Vec2::new(150.0, 650.0),
    Vec2::new(-300.0, 800.0),
    Vec2::new(5.0, 200.0),
    Vec2::new(280.0, 500.0),
];

/// Launch and step until idle, collecting every snapshot
fn play_round(game: &mut Game, aim: Vec2) -> Vec<Snapshot> {
    game.on_launch(aim);
    let mut snapshots = vec![game.step(NOMINAL_FRAME_DT)];
    for _ in 0..20_000 {
        if snapshots.last().is_some_and(|s| s.phase == RoundPhase::Idle) {
            break;
        }
        snapshots.push(game.step(NOMINAL_FRAME_DT));
    }
    snapshots
}

fn assert_board_is_sane(snapshot: &Snapshot) {
    let ids: Vec<u32> = snapshot.targets.iter().map(|t| t.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted, "targets must be ordered by id");

    for (i, a) in snapshot.targets.iter().enumerate() {
        assert!(a.health > 0);
        for b in &snapshot.targets[i + 1..] {
            assert!(distance(a.position, b.position) >= a.radius + b.radius - 1e-3);
        }
    }
}

#[test]
fn accumulated_score_is_sum_of_round_bonuses() {
    let mut game = Game::new(4242);
    let mut bonus_sum = 0u64;
    let mut destroyed_sum = 0u32;

    for aim in AIMS {
        let snapshots = play_round(&mut game, aim);
        let last = snapshots.last().unwrap();
        assert_eq!(last.phase, RoundPhase::Idle, "round must settle");

        let mut round_ends = 0;
        for snap in &snapshots {
            assert_board_is_sane(snap);
            for event in &snap.events {
                match event {
                    GameEvent::RoundEnded { destroyed, bonus, .. } => {
                        round_ends += 1;
                        assert_eq!(*bonus, u64::from(*destroyed) * u64::from(*destroyed));
                        bonus_sum += bonus;
                        destroyed_sum += destroyed;
                    }
                    GameEvent::TargetDestroyed { id, .. } => {
                        assert!(snap.targets.iter().all(|t| t.id != *id));
                    }
                    _ => {}
                }
            }
        }
        assert_eq!(round_ends, 1);
    }

    let score = game.score();
    assert_eq!(score.level, AIMS.len() as u32);
    assert_eq!(score.accumulated_score, bonus_sum);
    assert_eq!(score.targets_destroyed_total, destroyed_sum);
    assert_eq!(score.launches, AIMS.len() as u32);
}

#[test]
fn same_seed_same_game() {
    let mut a = Game::new(77);
    let mut b = Game::new(77);
    for aim in AIMS {
        let sa = play_round(&mut a, aim);
        let sb = play_round(&mut b, aim);
        assert_eq!(sa, sb);
    }
}

#[test]
fn reset_mid_flight_starts_over() {
    let mut game = Game::new(9);
    play_round(&mut game, AIMS[0]);
    game.on_launch(AIMS[1]);
    for _ in 0..5 {
        game.step(NOMINAL_FRAME_DT);
    }

    game.on_reset();
    let snap = game.step(NOMINAL_FRAME_DT);
    assert!(snap.ball.is_none());
    assert!(snap.targets.is_empty());
    assert!(snap.shockwaves.is_empty());
    assert_eq!(snap.score.level, 0);

    let snap = game.step(NOMINAL_FRAME_DT);
    assert!(!snap.targets.is_empty());
    assert_eq!(snap.phase, RoundPhase::Idle);
}

#[test]
fn tuning_overrides_apply() {
    let tuning = Tuning::from_json(
        r#"{ "min_target_health": 9, "max_target_health": 9, "ball_radius": 22.0 }"#,
    )
    .unwrap();
    let mut game = Game::with_tuning(5, tuning).unwrap();
    assert!(!game.state().targets.is_empty());
    assert!(game.state().targets.iter().all(|t| t.health == 9));

    game.on_launch(AIMS[0]);
    let snap = game.step(NOMINAL_FRAME_DT);
    assert_eq!(snap.ball.map(|b| b.radius), Some(22.0));
}

#[test]
fn unusable_tuning_is_rejected() {
    let tuning = Tuning {
        min_deceleration: 0.0,
        ..Tuning::default()
    };
    assert!(Game::with_tuning(5, tuning).is_err());
}

#[test]
fn finished_game_goes_on_the_board() {
    let mut game = Game::new(31);
    for aim in AIMS {
        play_round(&mut game, aim);
    }

    let mut board = HighScores::new();
    let score = game.score().clone();
    let rank = board.record(&score, 1_700_000_000_000.0);
    if score.accumulated_score > 0 {
        assert_eq!(rank, Some(1));
        assert_eq!(board.entries[0].level, score.level);
    } else {
        assert!(rank.is_none());
    }
}
