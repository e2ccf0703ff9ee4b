use std::collections::{HashMap, VecDeque};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use maze_crawler::character::{CharacterState, Point, Stat};
use maze_crawler::config::{ExitPolicy, SessionConfig};
use maze_crawler::grid::{Direction, Dungeon, Grid, Position, Size, Tile};
use maze_crawler::session::{Outcome, Session};

// Fixed seed for deterministic tests
const TEST_SEED: u64 = 42;

fn config(seed: u64) -> SessionConfig {
    SessionConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

/// Shortest walkable route as a list of steps.
fn route(dungeon: &Dungeon, from: Position, to: Position) -> Option<Vec<Direction>> {
    let mut came_from: HashMap<Position, (Position, Direction)> = HashMap::new();
    let mut queue = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut steps = Vec::new();
            let mut at = to;

            while at != from {
                let (previous, direction) = came_from[&at];
                steps.push(direction);
                at = previous;
            }

            steps.reverse();
            return Some(steps);
        }

        for direction in Direction::ALL {
            let Some(next) = dungeon.neighbor_position(current.0, current.1, direction) else {
                continue;
            };

            if next == from || came_from.contains_key(&next) {
                continue;
            }

            if dungeon.classify(next.0, next.1).unwrap().is_walkable() {
                came_from.insert(next, (current, direction));
                queue.push_back(next);
            }
        }
    }

    None
}

fn stat_line(session: &Session) -> [i32; 5] {
    let character = session.character();

    [
        character.stat(Stat::Strength),
        character.stat(Stat::Intelligence),
        character.stat(Stat::Dexterity),
        character.life(),
        character.stat(Stat::Mana),
    ]
}

fn assert_playable(session: &Session) {
    let dungeon = session.dungeon();
    let spawn = session.character_tile().expect("character outside the dungeon");
    let exit = session.exit();

    assert!(dungeon.corners().contains(&spawn), "spawn {:?} is not a corner", spawn);
    assert_ne!(dungeon.classify(spawn.0, spawn.1), Ok(Tile::Wall));
    assert_eq!(dungeon.count(Tile::Exit), 1);
    assert_eq!(dungeon.classify(exit.0, exit.1), Ok(Tile::Exit));
    assert!(route(dungeon, spawn, exit).is_some(), "exit {:?} unreachable", exit);
}

fn walk_to_exit(session: &mut Session) -> Outcome {
    let spawn = session.character_tile().unwrap();
    let steps = route(session.dungeon(), spawn, session.exit()).unwrap();
    let mut outcome = Outcome::Ignored;

    for direction in steps {
        outcome = session.request_move(direction);
        assert_ne!(outcome, Outcome::Blocked);
    }

    outcome
}

#[test]
fn test_new_session_layout() {
    for seed in 0..30 {
        let session = Session::new(config(seed)).unwrap();
        let spawn = session.character_tile().unwrap();

        assert_playable(&session);
        assert_eq!(session.exit(), session.dungeon().mirror(spawn));
        assert_eq!(session.character().position(), Point::center_of(spawn, 40.0));
        assert_eq!(session.dungeon().dimensions(), Size::new(20, 15));
    }
}

#[test]
fn test_same_seed_same_run() {
    let first = Session::new(config(TEST_SEED)).unwrap();
    let second = Session::new(config(TEST_SEED)).unwrap();

    assert_eq!(first.dungeon().to_string(), second.dungeon().to_string());
    assert_eq!(first.character_tile(), second.character_tile());
    assert_eq!(first.seed(), TEST_SEED);
}

#[test]
fn test_walking_to_the_exit_wins() {
    let mut session = Session::new(config(TEST_SEED)).unwrap();
    let before = stat_line(&session);
    let layout = session.dungeon().to_string();

    assert_eq!(walk_to_exit(&mut session), Outcome::Won);

    let after = stat_line(&session);
    let gained: Vec<i32> = after.iter().zip(before.iter()).map(|(a, b)| a - b).collect();

    // One reward for the win plus one per level gained on the way
    let rewards = session.character().level() as i32;
    assert_eq!(gained, vec![2 * rewards, 2 * rewards, 2 * rewards, 15 * rewards, 5 * rewards]);

    assert_eq!(session.depth(), 1);
    assert_eq!(session.last_tile(), None);
    assert_eq!(session.dungeon().dimensions(), Size::new(20, 15));
    assert_ne!(session.dungeon().to_string(), layout);
    assert_playable(&session);
}

#[test]
fn test_click_on_exit_under_character_wins() {
    let mut dungeon = Grid::new(3, 3, &mut |_, _| Tile::Floor);
    dungeon.set_classification(1, 1, Tile::Exit).unwrap();

    let mut session = Session::with_dungeon(config(TEST_SEED), dungeon, (1, 1)).unwrap();
    let before = stat_line(&session);

    assert_eq!(session.request_move_to(1, 1), Outcome::Won);

    let after = stat_line(&session);

    assert_eq!(
        [after[0] - before[0], after[1] - before[1], after[2] - before[2], after[3] - before[3], after[4] - before[4]],
        [2, 2, 2, 15, 5]
    );
    assert_eq!(session.depth(), 1);
    assert_eq!(session.dungeon().dimensions(), Size::new(3, 3));
    assert_playable(&session);

    // The fresh maze spawns in a corner, out of reach of the centre
    assert_eq!(session.last_tile(), None);
    assert_eq!(session.request_move_to(1, 1), Outcome::Ignored);
    assert_eq!(session.depth(), 1);
}

#[test]
fn test_many_wins_keep_the_run_playable() {
    for policy in [ExitPolicy::Mirrored, ExitPolicy::CornerThenInterior] {
        let mut session = Session::new(SessionConfig {
            size: Size::new(9, 7),
            seed: Some(TEST_SEED),
            exit_policy: policy,
            ..Default::default()
        })
        .unwrap();

        for depth in 1..=10 {
            assert_eq!(walk_to_exit(&mut session), Outcome::Won);
            assert_eq!(session.depth(), depth);
            assert_playable(&session);
        }
    }
}

#[test]
fn test_moves_only_change_position_on_walkable_tiles() {
    let mut session = Session::new(config(TEST_SEED)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(TEST_SEED);

    for _ in 0..500 {
        let direction = *Direction::ALL.choose(&mut rng).unwrap();
        let position = session.character().position();
        let (x, y) = session.character_tile().unwrap();
        let target = session.dungeon().neighbor_position(x, y, direction);
        let open = target
            .map(|(tx, ty)| session.dungeon().classify(tx, ty).unwrap().is_walkable())
            .unwrap_or(false);

        let outcome = session.request_move(direction);

        if outcome == Outcome::Won {
            continue;
        }

        if open {
            assert_eq!(outcome, Outcome::Moved);
            assert_eq!(session.character_tile(), target);
        } else {
            assert_eq!(outcome, Outcome::Blocked);
            assert_eq!(session.character().position(), position);
        }
    }
}

#[test]
fn test_experience_only_grows_on_moves() {
    let mut session = Session::new(config(TEST_SEED)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(7);

    for _ in 0..2000 {
        let direction = *Direction::ALL.choose(&mut rng).unwrap();
        let before = session.character().progression();

        let outcome = session.request_move(direction);
        let after = session.character().progression();

        match outcome {
            Outcome::Moved | Outcome::Won if after.level == before.level => {
                assert_eq!(after.experience, before.experience + 5);
            }
            Outcome::Moved | Outcome::Won => {
                assert_eq!(after.level, before.level + 1);
                assert_eq!(after.experience, 0);
            }
            _ => assert_eq!(after, before),
        }

        assert!(after.experience < after.experience_required);
    }
}

#[test]
fn test_level_up_after_hundred_moves() {
    // ...
    // ..E
    let mut dungeon = Grid::new(3, 2, &mut |_, _| Tile::Floor);
    dungeon.set_classification(2, 1, Tile::Exit).unwrap();

    let mut session = Session::with_dungeon(config(TEST_SEED), dungeon, (0, 0)).unwrap();
    let before = stat_line(&session);

    for step in 0..99 {
        let direction = if step % 2 == 0 { Direction::Right } else { Direction::Left };
        assert_eq!(session.request_move(direction), Outcome::Moved);
    }

    assert_eq!(session.character().experience(), 495);
    assert_eq!(session.character().level(), 1);

    assert_eq!(session.request_move(Direction::Right), Outcome::Moved);

    let progression = session.character().progression();
    assert_eq!(progression.level, 2);
    assert_eq!(progression.experience, 0);
    assert_eq!(progression.experience_required, 625);

    let after = stat_line(&session);
    assert_eq!(after[0] - before[0], 2);
    assert_eq!(after[3] - before[3], 15);
    assert_eq!(after[4] - before[4], 5);

    assert_eq!(session.tick(), CharacterState::Walking);
}

#[test]
fn test_duplicate_click_is_suppressed() {
    let dungeon = Grid::new(4, 4, &mut |x, _| if x == 1 { Tile::Wall } else { Tile::Floor });
    let mut session = Session::with_dungeon(config(TEST_SEED), dungeon, (0, 0)).unwrap();

    // Wall click reaches the character once, then is dropped
    assert_eq!(session.request_move_to(1, 0), Outcome::Blocked);
    assert_eq!(session.request_move_to(1, 0), Outcome::Ignored);

    assert_eq!(session.request_move_to(0, 1), Outcome::Moved);
    let position = session.character().position();
    let experience = session.character().experience();

    // Same wall from the new tile: blocked once, then dropped
    assert_eq!(session.request_move_to(1, 1), Outcome::Blocked);
    assert_eq!(session.request_move_to(1, 1), Outcome::Ignored);
    assert_eq!(session.last_tile(), Some((1, 1)));
    assert_eq!(session.character().position(), position);
    assert_eq!(session.character().experience(), experience);

    // A different tile clears the suppression
    assert_eq!(session.request_move_to(0, 0), Outcome::Moved);
    assert_eq!(session.request_move_to(1, 0), Outcome::Blocked);
    assert_eq!(session.request_move_to(0, 1), Outcome::Moved);
    assert_eq!(session.request_move_to(0, 0), Outcome::Moved);
}

#[test]
fn test_far_and_outside_clicks_are_ignored() {
    let dungeon = Grid::new(4, 4, &mut |_, _| Tile::Floor);
    let mut session = Session::with_dungeon(config(TEST_SEED), dungeon, (0, 0)).unwrap();

    assert_eq!(session.request_move_to(1, 1), Outcome::Ignored);
    assert_eq!(session.request_move_to(0, 2), Outcome::Ignored);
    assert_eq!(session.request_move_to(9, 0), Outcome::Ignored);
    assert_eq!(session.character_tile(), Some((0, 0)));
    assert_eq!(session.last_tile(), None);
}

#[test]
fn test_defeat_freezes_the_run() {
    let dungeon = Grid::new(4, 4, &mut |_, _| Tile::Floor);
    let mut session = Session::with_dungeon(config(TEST_SEED), dungeon, (0, 0)).unwrap();

    session.apply_damage(200);

    assert_eq!(session.character().life(), -100);
    assert!(session.is_defeated());

    let position = session.character().position();

    assert_eq!(session.request_move(Direction::Right), Outcome::Ignored);
    assert_eq!(session.request_move_to(0, 1), Outcome::Ignored);
    session.apply_damage(10);

    assert_eq!(session.character().position(), position);
    assert_eq!(session.character().life(), -100);
    assert_eq!(session.tick(), CharacterState::Defeated);
}
