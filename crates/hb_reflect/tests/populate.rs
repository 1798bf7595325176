mod common;

use std::cell::RefCell;
use std::rc::Rc;

use hb_reflect::wire::Vector3;
use hb_reflect::{CodecOptions, LogEntry, LogLevel, ObjRef, ReflectErrorKind, Reflector, SerializedNode};
use serde_json::json;

use common::{Player, Stats, Team, World};

fn stats() -> Stats {
    Stats {
        hp: 10,
        speed: 2.0,
        team: Team::Blue,
    }
}

#[test]
fn partial_update_keeps_other_members() {
    let (main, _world, reflector) = common::setup();
    let mut value = stats();

    let node = SerializedNode::new("stats", "Game.Stats")
        .with_field(SerializedNode::leaf("hp", "i32", json!(25)));
    let report = reflector.populate(&main, &mut value, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(
        value,
        Stats {
            hp: 25,
            ..stats()
        }
    );
}

#[test]
fn nested_members_and_unknown_names() {
    let (main, world, reflector) = common::setup();
    let player = world.spawn(Player {
        position: Vector3::new(1.0, 2.0, 3.0),
        ..Player::named("p")
    });

    let node = SerializedNode::new("p", "Game.Player")
        .with_field(
            SerializedNode::new("position", "hb_reflect::wire::Vector3")
                .with_field(SerializedNode::leaf("x", "f32", json!(4.0))),
        )
        .with_field(SerializedNode::leaf("mana", "i32", json!(3)))
        .with_field(SerializedNode::leaf("tags", "", json!(["fast", "loud"])));
    let report = reflector.populate_instance(&main, &player, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(report.logs.count_kind(ReflectErrorKind::MemberNotFound), 1);
    player
        .with(|p: &Player| {
            assert_eq!(p.position, Vector3::new(4.0, 2.0, 3.0));
            assert_eq!(p.tags, ["fast", "loud"]);
        })
        .unwrap();
}

#[test]
fn failed_member_does_not_stop_siblings() {
    let (main, _world, reflector) = common::setup();
    let mut value = stats();

    let node = SerializedNode::new("stats", "Game.Stats")
        .with_field(SerializedNode::leaf("hp", "i32", json!("lots")))
        .with_field(SerializedNode::leaf("speed", "f32", json!(3.5)));
    let report = reflector.populate(&main, &mut value, &node);

    assert!(!report.is_success());
    assert_eq!(report.logs.count_kind(ReflectErrorKind::DecodeMismatch), 1);
    assert_eq!(value.hp, 10);
    assert_eq!(value.speed, 3.5);
}

#[test]
fn empty_nodes_leave_values_unchanged() {
    let (main, _world, reflector) = common::setup();

    let mut hp = 5_i32;
    let report = reflector.populate(&main, &mut hp, &SerializedNode::new("hp", "i32"));
    assert!(report.is_success());
    assert_eq!(hp, 5);

    let mut value = stats();
    let node = SerializedNode::new("stats", "Game.Stats")
        .with_field(SerializedNode::new("hp", ""))
        .with_field(SerializedNode::leaf("team", "", json!("Red")));
    assert!(reflector.populate(&main, &mut value, &node).is_success());
    assert_eq!(value.hp, 10);
    assert_eq!(value.team, Team::Red);
}

#[test]
fn read_only_property_is_reported() {
    let (main, world, reflector) = common::setup();
    let player = world.spawn(Player::named("p"));

    let node = SerializedNode::new("p", "Game.Player")
        .with_property(SerializedNode::leaf("level", "i32", json!(99)))
        .with_property(SerializedNode::leaf("nickname", "", json!("Pip")));
    let report = reflector.populate_instance(&main, &player, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(report.logs.count_kind(ReflectErrorKind::MemberNotWritable), 1);
    player
        .with(|p: &Player| {
            assert_eq!(p.stats.hp, 0);
            assert_eq!(p.nick, "Pip");
        })
        .unwrap();
}

#[test]
fn members_beyond_max_depth_are_skipped() {
    let (main, _world, reflector) = common::setup();
    let shallow = Reflector::new(World::new()).with_options(CodecOptions::new().with_max_depth(0));
    let mut value = stats();

    let node = SerializedNode::new("stats", "Game.Stats")
        .with_field(SerializedNode::leaf("hp", "i32", json!(1)));
    let report = shallow.populate(&main, &mut value, &node);
    assert!(report.is_success());
    assert_eq!(value.hp, 10);
    assert!(report.logs.iter().any(|e| e.level == LogLevel::Warning));

    assert!(reflector.populate(&main, &mut value, &node).is_success());
    assert_eq!(value.hp, 1);
}

#[test]
fn sink_sees_every_entry() {
    let main = hb_reflect::MainThread::current();
    let seen: Rc<RefCell<Vec<LogEntry>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let reflector = Reflector::new(World::new())
        .with_sink(move |entry: &LogEntry| sink.borrow_mut().push(entry.clone()));

    let mut value = stats();
    let node = SerializedNode::new("stats", "Game.Stats")
        .with_field(SerializedNode::leaf("hp", "i32", json!(7)))
        .with_field(SerializedNode::leaf("armor", "i32", json!(1)));
    let report = reflector.populate(&main, &mut value, &node);

    assert!(!report.logs.is_empty());
    assert_eq!(seen.borrow().as_slice(), report.logs.entries());
}

#[test]
fn explicit_null_clears_a_reference() {
    let (main, world, reflector) = common::setup();
    let bob = world.spawn(Player::named("Bob"));
    let alice = world.spawn(Player {
        target: ObjRef::new(&bob),
        companion: ObjRef::new(&bob),
        ..Player::named("Alice")
    });

    let node = SerializedNode::new("alice", "Game.Player")
        .with_field(SerializedNode::leaf("target", "Game.Player", json!(null)));
    let report = reflector.populate_instance(&main, &alice, &node);

    assert!(report.is_success(), "{report}");
    alice
        .with(|p: &Player| {
            assert!(p.target.is_null());
            assert!(p.companion.get().unwrap().ptr_eq(&bob));
        })
        .unwrap();
}

#[test]
fn null_value_beside_members_is_a_partial_update() {
    let (main, world, reflector) = common::setup();
    let player = world.spawn(Player {
        stats: stats(),
        ..Player::named("p")
    });

    let node = SerializedNode::new("p", "Game.Player").with_field(
        SerializedNode::leaf("stats", "Game.Stats", json!(null))
            .with_field(SerializedNode::leaf("hp", "i32", json!(25))),
    );
    let report = reflector.populate_instance(&main, &player, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(
        player.with(|p: &Player| p.stats.clone()).unwrap(),
        Stats {
            hp: 25,
            ..stats()
        }
    );

    let mut value = stats();
    let node = SerializedNode::leaf("stats", "Game.Stats", json!(null))
        .with_field(SerializedNode::leaf("speed", "f32", json!(4.5)));
    assert!(reflector.populate(&main, &mut value, &node).is_success());
    assert_eq!(
        value,
        Stats {
            speed: 4.5,
            ..stats()
        }
    );
}
