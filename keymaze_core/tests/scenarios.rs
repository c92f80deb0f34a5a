use keymaze_core::{
    Direction, EngineConfig, GridEngine, Outcome, Position,
    level::{BUILTIN_LEVEL, Heading},
};
use pretty_assertions::assert_eq;

fn engine(rows: &[&str]) -> GridEngine {
    GridEngine::from_map(&rows.join("\n"), EngineConfig::default()).unwrap()
}

#[test]
fn basic_key_pickup_opens_the_door() {
    let mut engine = engine(&[
        "#####", //
        "#P  #",
        "#K  #",
        "#  D#",
        "#####",
    ]);
    assert_eq!(engine.state().total_keys, 1);

    let outcomes = engine.try_move_delta(0, 1);

    let state = engine.state();
    assert_eq!(state.player, Position::new(1, 2));
    assert!(state.keys[0].collected);
    assert_eq!(state.keys_collected, 1);
    assert!(state.door.open);
    assert!(outcomes.contains(&Outcome::AllKeysCollected));
}

#[test]
fn blocked_push_leaves_state_untouched() {
    let mut engine = engine(&[
        "#####", //
        "#PB##",
        "#  D#",
        "#####",
    ]);
    let before = engine.state().clone();

    assert_eq!(engine.try_move_delta(1, 0), vec![Outcome::None]);
    assert_eq!(engine.state(), &before);
}

#[test]
fn enemy_steps_onto_player_on_tick() {
    let mut engine = engine(&[
        "##########", //
        "#        #",
        "#        #",
        "#        #",
        "#        #",
        "#    EP  #",
        "#       D#",
        "##########",
    ]);
    assert_eq!(engine.state().enemies[0].position, Position::new(5, 5));
    assert_eq!(engine.state().enemies[0].heading, Heading::Right);

    assert_eq!(engine.advance_enemies(), Outcome::Death);
    assert_eq!(engine.state().enemies[0].position, Position::new(6, 5));
    assert_eq!(engine.state().player, Position::new(6, 5));
    assert_eq!(
        engine.pending_reset().map(|pending| pending.reason),
        Some(Outcome::Death)
    );
}

#[test]
fn closed_door_reports_locked() {
    let mut engine = engine(&[
        "######", //
        "#PD K#",
        "######",
    ]);
    let before = engine.state().clone();

    assert_eq!(engine.try_move(Direction::Right), vec![Outcome::DoorLocked]);
    assert_eq!(engine.last_outcome(), Outcome::DoorLocked);
    assert_eq!(engine.state(), &before);
    assert!(!engine.state().door.open);
}

#[test]
fn win_resets_after_delay() {
    let config = EngineConfig {
        win_reset_frames: 3,
        ..Default::default()
    };
    let mut engine = GridEngine::from_map("KPD", config).unwrap();
    let fresh = engine.state().clone();

    engine.try_move(Direction::Left);
    engine.try_move(Direction::Right);
    assert_eq!(engine.try_move(Direction::Right), vec![Outcome::Win]);

    let outcomes: Vec<Outcome> = (0..3).map(|_| engine.tick()).collect();
    assert_eq!(
        outcomes,
        vec![Outcome::None, Outcome::None, Outcome::LevelReset]
    );
    assert_eq!(engine.state(), &fresh);
}

#[test]
fn second_ending_does_not_reschedule() {
    let config = EngineConfig {
        death_reset_frames: 5,
        lock_input_during_reset: false,
        ..Default::default()
    };
    let mut engine = GridEngine::from_map("EPE D", config).unwrap();
    assert_eq!(engine.advance_enemies(), Outcome::Death);
    engine.tick();
    engine.tick();

    assert_eq!(engine.try_move(Direction::Right), vec![Outcome::Death]);
    assert_eq!(engine.pending_reset().map(|p| p.frames_left), Some(3));
}

#[test]
fn builtin_level_block_slides_through_the_gap() {
    let mut engine = GridEngine::builtin(EngineConfig::default());
    assert_eq!(engine.state().player, Position::new(1, 1));
    assert!(BUILTIN_LEVEL.starts_with('#'));

    engine.try_move(Direction::Right);
    for _ in 0..3 {
        assert_eq!(engine.try_move(Direction::Down), vec![Outcome::None]);
    }
    assert_eq!(engine.state().player, Position::new(2, 4));
    assert_eq!(engine.state().blocks[0], Position::new(2, 5));
}
