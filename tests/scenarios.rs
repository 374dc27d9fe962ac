//! End-to-end scenarios driven through the public API: plans in, frames
//! stepped, status and events out.

use std::time::Duration;

use lavarunner::config::PhysicsConfig;
use lavarunner::domain::actor::Role;
use lavarunner::domain::input::{Action, InputState};
use lavarunner::domain::tile::Tile;
use lavarunner::domain::vector::Vector;
use lavarunner::error::LevelError;
use lavarunner::sim::event::GameEvent;
use lavarunner::sim::level::{Level, Status};
use lavarunner::sim::plan::LevelPlan;
use lavarunner::sim::step::{self, Session};

fn level(rows: &[&str]) -> Level {
    Level::from_plan(&LevelPlan::from_rows(rows), &PhysicsConfig::default()).unwrap()
}

fn player_speed(level: &Level) -> Vector {
    level.player().unwrap().velocity()
}

#[test]
fn walled_cell_blocks_fall_and_jumps_only_on_up() {
    let idle = {
        let mut lv = level(&["xxx", "x@x", "xxx"]);
        let start = lv.player().unwrap().position();
        step::step(&mut lv, 0.1, &InputState::default());
        assert_eq!(lv.player().unwrap().position(), start);
        player_speed(&lv)
    };
    assert!((idle.y - 2.0).abs() < 1e-9);

    let mut lv = level(&["xxx", "x@x", "xxx"]);
    step::step(&mut lv, 0.1, &InputState::holding(&[Action::Up]));
    assert_eq!(player_speed(&lv).y, -10.0);
    assert_eq!(lv.status(), Status::InProgress);
}

#[test]
fn coin_overlap_wins_the_level() {
    let mut lv = level(&["x$x", "x@x", "xxx"]);
    assert_eq!(lv.coins(), (0, 1));

    let events = step::step(&mut lv, 0.016, &InputState::default());

    assert_eq!(lv.coins(), (1, 1));
    assert_eq!(lv.status(), Status::Won);
    assert!(events.contains(&GameEvent::LevelWon));
}

#[test]
fn hazard_patrols_between_walls() {
    let mut lv = level(&["xxxxxxx", "x - x@x", "xxxxxxx"]);
    let hazard_id = lv.actors()[0].id;
    let hazard = |lv: &Level| lv.actor(hazard_id).unwrap().clone();
    let idle = InputState::default();

    step::step(&mut lv, 0.25, &idle);
    assert_eq!(hazard(&lv).position(), Vector::new(2.5, 1.0));
    step::step(&mut lv, 0.25, &idle);
    assert_eq!(hazard(&lv).position(), Vector::new(3.0, 1.0));

    // Candidate 3.5..4.5 hits the wall at column 4: reverse, stay put.
    step::step(&mut lv, 0.25, &idle);
    assert_eq!(hazard(&lv).position(), Vector::new(3.0, 1.0));
    assert_eq!(hazard(&lv).velocity(), Vector::new(-2.0, 0.0));

    for _ in 0..100 {
        step::step(&mut lv, 0.25, &idle);
        let b = hazard(&lv).bounds();
        assert!(b.left() >= 1.0 && b.right() <= 4.0, "hazard entered a wall: {b:?}");
    }
    assert_eq!(lv.status(), Status::InProgress);
}

#[test]
fn idle_on_dark_blue_stays_alive() {
    let mut lv = Level::from_plan(&LevelPlan::builtin(), &PhysicsConfig::default()).unwrap();
    for _ in 0..120 {
        step::step(&mut lv, 1.0 / 60.0, &InputState::default());
    }
    assert_eq!(lv.status(), Status::InProgress);
    assert_eq!(lv.coins(), (0, 3));
}

#[test]
fn running_off_the_ledge_into_lava_loses() {
    let mut lv = Level::from_plan(&LevelPlan::builtin(), &PhysicsConfig::default()).unwrap();
    let right = InputState::holding(&[Action::Right]);

    let mut events = Vec::new();
    for _ in 0..60 {
        events.extend(step::step(&mut lv, 0.05, &right));
    }

    assert_eq!(lv.status(), Status::Lost);
    assert_eq!(
        events.iter().filter(|e| **e == GameEvent::LevelLost).count(),
        1
    );
    assert!(events.contains(&GameEvent::PlayerBurned));
}

#[test]
fn session_recreates_level_after_loss() {
    let plan = LevelPlan::parse("# Pit\nx x\nx@x\nx x\nx!x\n").unwrap();
    let mut session = Session::new(&plan, &PhysicsConfig::default(), Duration::from_millis(500)).unwrap();
    let idle = InputState::default();

    let mut restarted = None;
    for _ in 0..100 {
        for event in session.frame(0.05, &idle) {
            if let GameEvent::LevelRestarted { attempt } = event {
                restarted = Some(attempt);
            }
        }
        if restarted.is_some() {
            break;
        }
    }

    assert_eq!(restarted, Some(2));
    assert_eq!(session.level().name(), "Pit");
    assert_eq!(session.level().status(), Status::InProgress);
    let player = session.level().player().unwrap();
    assert_eq!(player.role(), Role::Player);
    assert_eq!(player.velocity(), Vector::ZERO);
}

#[test]
fn malformed_plans_are_rejected() {
    let ragged = Level::from_plan(&LevelPlan::from_rows(&["x@x", "xx"]), &PhysicsConfig::default());
    assert!(matches!(
        ragged,
        Err(LevelError::RaggedRow { row: 1, expected: 3, found: 2 })
    ));

    let empty = Level::from_plan(&LevelPlan::from_rows(&[]), &PhysicsConfig::default());
    assert!(matches!(empty, Err(LevelError::EmptyPlan)));
}

#[test]
fn shipped_level_file_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("levels/dark_blue.txt");
    let plan = LevelPlan::load(&path).unwrap();
    assert_eq!(plan.name, "Dark Blue");

    let lv = Level::from_plan(&plan, &PhysicsConfig::default()).unwrap();
    let builtin = Level::from_plan(&LevelPlan::builtin(), &PhysicsConfig::default()).unwrap();
    assert_eq!(lv.coins(), (0, 3));
    assert_eq!(lv.width(), 23);
    assert_eq!(lv.height(), builtin.height());
    assert_eq!(plan.rows, LevelPlan::builtin().rows);

    // The open bottom row is playable space, not the lava boundary.
    let bottom_row = Vector::new(0.0, 8.0);
    assert_eq!(lv.collide_with(bottom_row, Vector::new(1.0, 1.0)), None);
    assert_eq!(lv.collide_with(Vector::new(0.0, 8.5), Vector::new(1.0, 1.0)), Some(Tile::Lava));
}
