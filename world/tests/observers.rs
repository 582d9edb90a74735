use std::{cell::RefCell, rc::Rc, time::Duration};

use labyrinth_core::{CellCoord, Difficulty, Direction, Event, MazeGrid, Pickup, PickupKind};
use labyrinth_world::{query, Layout, World, WorldConfig, WorldObserver};

fn corridor() -> World {
    let grid = MazeGrid::from_rows(&["......"]).expect("grid parses");
    let layout = Layout::new(grid, CellCoord::new(0, 0), CellCoord::new(5, 0))
        .with_pickups([Pickup::new(CellCoord::new(1, 0), PickupKind::Invincibility)])
        .with_agents([CellCoord::new(4, 0)]);
    World::from_layout(WorldConfig::new(Difficulty::Easy).with_seed(2), layout)
        .expect("layout is valid")
}

struct PositionLog {
    tag: &'static str,
    log: Rc<RefCell<Vec<(&'static str, CellCoord)>>>,
}

impl WorldObserver for PositionLog {
    fn on_world_changed(&mut self, world: &World) {
        self.log.borrow_mut().push((self.tag, query::player(world)));
    }
}

#[test]
fn registration_delivers_current_state() {
    let mut world = corridor();
    let log = Rc::new(RefCell::new(Vec::new()));
    let _ = world.register_observer(PositionLog {
        tag: "first",
        log: Rc::clone(&log),
    });
    assert_eq!(*log.borrow(), vec![("first", CellCoord::new(0, 0))]);
}

#[test]
fn observers_run_in_registration_order() {
    let mut world = corridor();
    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let _ = world.register_observer(PositionLog {
            tag,
            log: Rc::clone(&log),
        });
    }
    log.borrow_mut().clear();

    let mut events = Vec::new();
    world
        .move_player(Direction::Right, &mut events)
        .expect("no level change");

    let moved = CellCoord::new(1, 0);
    assert_eq!(
        *log.borrow(),
        vec![("first", moved), ("second", moved), ("third", moved)]
    );
}

#[test]
fn every_mutating_call_notifies_once() {
    let mut world = corridor();
    let count = Rc::new(RefCell::new(0_u32));
    let counter = Rc::clone(&count);
    let _ = world.register_observer(move |_: &World| *counter.borrow_mut() += 1);
    let mut events = Vec::new();

    world
        .move_player(Direction::Right, &mut events)
        .expect("no level change");
    assert_eq!(*count.borrow(), 2);

    world.move_agents(&mut events);
    assert_eq!(*count.borrow(), 3);

    world.decay_effects(Duration::from_millis(50), &mut events);
    assert_eq!(*count.borrow(), 4);

    world.set_paused(true, &mut events);
    assert_eq!(*count.borrow(), 5);

    world
        .restart(Difficulty::Easy, false, &mut events)
        .expect("level builds");
    assert_eq!(*count.borrow(), 6);
}

#[test]
fn quiet_decay_does_not_notify() {
    let mut world = corridor();
    let count = Rc::new(RefCell::new(0_u32));
    let counter = Rc::clone(&count);
    let _ = world.register_observer(move |_: &World| *counter.borrow_mut() += 1);

    let mut events = Vec::new();
    world.decay_effects(Duration::from_millis(50), &mut events);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn unregistered_observer_stops_receiving() {
    let mut world = corridor();
    let count = Rc::new(RefCell::new(0_u32));
    let counter = Rc::clone(&count);
    let id = world.register_observer(move |_: &World| *counter.borrow_mut() += 1);
    assert_eq!(query::observer_count(&world), 1);

    assert!(world.unregister_observer(id));
    assert!(!world.unregister_observer(id));
    assert_eq!(query::observer_count(&world), 0);

    let mut events = Vec::new();
    world
        .move_player(Direction::Right, &mut events)
        .expect("no level change");
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn level_advance_notifies_with_the_new_level() {
    let grid = MazeGrid::from_rows(&["..."]).expect("grid parses");
    let layout = Layout::new(grid, CellCoord::new(0, 0), CellCoord::new(1, 0));
    let mut world = World::from_layout(WorldConfig::new(Difficulty::Medium), layout)
        .expect("layout is valid");
    let levels = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&levels);
    let _ = world.register_observer(move |world: &World| seen.borrow_mut().push(query::level(world)));

    let mut events = Vec::new();
    world
        .move_player(Direction::Right, &mut events)
        .expect("next level builds");
    assert_eq!(*levels.borrow(), vec![1, 2]);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        Event::PlayerMoved {
            from: CellCoord::new(0, 0),
            to: CellCoord::new(1, 0),
        }
    );
    assert!(matches!(events[1], Event::LevelStarted { level: 2, .. }));
}

#[test]
fn callbacks_see_the_live_observer_count() {
    let mut world = corridor();
    let counts = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&counts);
    let _ = world.register_observer(move |world: &World| {
        seen.borrow_mut().push(query::observer_count(world));
    });
    assert_eq!(*counts.borrow(), vec![1]);

    let second = world.register_observer(|_: &World| {});
    let mut events = Vec::new();
    world
        .move_player(Direction::Right, &mut events)
        .expect("no level change");
    assert_eq!(*counts.borrow(), vec![1, 2]);

    assert!(world.unregister_observer(second));
    world.set_paused(true, &mut events);
    assert_eq!(*counts.borrow(), vec![1, 2, 1]);
}
