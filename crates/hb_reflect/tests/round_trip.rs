mod common;

use hb_reflect::refs::NoHooks;
use hb_reflect::wire::Vector3;
use hb_reflect::{CodecOptions, NumberHandling, ObjRef, Reflect, ReflectErrorKind, Reflector, SerializedNode};
use serde_json::json;

use common::{Item, Player, Stats, Team};

#[test]
fn vector_with_named_literals() {
    let (main, _world, reflector) = common::setup();
    let v = Vector3::new(1.0, f32::INFINITY, f32::NAN);

    let node = reflector.serialize(&main, &v, "v", true).unwrap();
    assert_eq!(node.value, Some(json!({"x": 1.0, "y": "Infinity", "z": "NaN"})));

    let mut back = Vector3::default();
    assert!(reflector.populate(&main, &mut back, &node).is_success());
    assert_eq!(back.x, 1.0);
    assert_eq!(back.y, f32::INFINITY);
    assert!(back.z.is_nan());

    let strict = Reflector::new(NoHooks)
        .with_options(CodecOptions::new().with_number_handling(NumberHandling::Strict));
    assert!(strict.serialize(&main, &v, "v", true).is_err());

    let mut untouched = Vector3::new(5.0, 5.0, 5.0);
    let report = strict.populate(&main, &mut untouched, &node);
    assert!(!report.is_success());
    assert_eq!(report.logs.count_kind(ReflectErrorKind::DecodeMismatch), 1);
    assert_eq!(untouched, Vector3::new(5.0, 5.0, 5.0));
}

#[test]
fn primitives_and_enums() {
    let (main, _world, reflector) = common::setup();

    let node = reflector.serialize(&main, &Team::Blue, "team", true).unwrap();
    assert_eq!(node.type_name, "Game.Team");
    assert_eq!(node.value, Some(json!("Blue")));

    let mut team = Team::Red;
    let by_name = SerializedNode::leaf("team", "Game.Team", json!("blue"));
    assert!(reflector.populate(&main, &mut team, &by_name).is_success());
    assert_eq!(team, Team::Blue);

    let by_index = SerializedNode::leaf("team", "Game.Team", json!(0));
    assert!(reflector.populate(&main, &mut team, &by_index).is_success());
    assert_eq!(team, Team::Red);

    let unknown = SerializedNode::leaf("team", "Game.Team", json!("Green"));
    assert!(!reflector.populate(&main, &mut team, &unknown).is_success());
    assert_eq!(team, Team::Red);

    let mut byte = 7_u8;
    let node = reflector.serialize(&main, &byte, "b", true).unwrap();
    assert_eq!(node.value, Some(json!(7)));
    let too_big = SerializedNode::leaf("b", "u8", json!(300));
    assert!(!reflector.populate(&main, &mut byte, &too_big).is_success());
    assert_eq!(byte, 7);
}

#[test]
fn host_object_round_trip() {
    let (main, world, reflector) = common::setup();
    let bob = world.spawn(Player::named("Bob"));
    let sword = world.spawn(Item {
        label: "sword".into(),
    });

    let stats = Stats {
        hp: 42,
        speed: 1.5,
        team: Team::Blue,
    };
    let alice = world.spawn(Player {
        name: "Alice".into(),
        stats: stats.clone(),
        position: Vector3::new(1.0, f32::INFINITY, f32::NAN),
        target: ObjRef::new(&bob),
        inventory: vec![ObjRef::new(&sword)],
        tags: vec!["a".into(), "b".into()],
        secret: 9,
        transform: Vector3::new(3.0, 3.0, 3.0),
        nick: "Ali".into(),
        ..Player::default()
    });

    let node = reflector.serialize_instance(&main, &alice, "alice", true).unwrap();
    assert_eq!(node.type_name, "Game.Player");
    assert_eq!(node.value, Some(json!({"instanceID": alice.id()})));
    assert!(node.field("secret").is_none());
    assert!(node.field("transform").is_none());
    assert_eq!(
        node.field("position").unwrap().value,
        Some(json!({"x": 1.0, "y": "Infinity", "z": "NaN"}))
    );
    assert_eq!(
        node.field("target").unwrap().value,
        Some(json!({"instanceID": bob.id()}))
    );
    assert_eq!(
        node.field("inventory").unwrap().value,
        Some(json!([{"instanceID": sword.id()}]))
    );
    let stats_node = node.field("stats").unwrap();
    assert!(stats_node.value.is_none());
    assert_eq!(stats_node.field("team").unwrap().value, Some(json!("Blue")));
    assert_eq!(node.property("level").unwrap().value, Some(json!(4)));

    let text = node.to_json_string().unwrap();
    let parsed = SerializedNode::from_json_str(&text).unwrap();
    assert_eq!(parsed, node);

    let copy = world.spawn(Player::default());
    let report = reflector.populate_instance(&main, &copy, &parsed);
    assert!(report.is_success(), "{report}");
    assert_eq!(report.logs.count_kind(ReflectErrorKind::MemberNotWritable), 1);

    copy.with(|p: &Player| {
        assert_eq!(p.name, "Alice");
        assert_eq!(p.stats, stats);
        assert_eq!(p.position.y, f32::INFINITY);
        assert!(p.position.z.is_nan());
        assert!(p.target.get().unwrap().ptr_eq(&bob));
        assert!(p.companion.is_null());
        assert_eq!(p.inventory.len(), 1);
        assert!(p.inventory[0].get().unwrap().ptr_eq(&sword));
        assert_eq!(p.tags, ["a", "b"]);
        assert_eq!(p.secret, 0);
        assert_eq!(p.transform, Vector3::default());
        assert_eq!(p.nick, "Ali");
    })
    .unwrap();
}

#[test]
fn deserialize_builds_fresh_values() {
    let (main, _world, reflector) = common::setup();
    let node = SerializedNode::new("s", "Game.Stats")
        .with_field(SerializedNode::leaf("hp", "i32", json!(5)))
        .with_field(SerializedNode::leaf("team", "Game.Team", json!("Blue")));

    let (stats, logs) = reflector.deserialize_as::<Stats>(&main, &node).unwrap();
    assert_eq!(
        stats,
        Stats {
            hp: 5,
            speed: 0.0,
            team: Team::Blue
        }
    );
    assert!(!logs.has_errors());

    let mut slot: Option<Box<dyn Reflect>> = None;
    let report = reflector.populate_or_create(&main, &mut slot, &node, None);
    assert!(report.is_success(), "{report}");
    let created = slot.take().unwrap().take::<Stats>().unwrap();
    assert_eq!(created.hp, 5);

    let unnamed = SerializedNode::new("s", "Game.Unknown");
    assert!(reflector.deserialize(&main, &unnamed, None).is_err());

    let host_object = SerializedNode::new("p", "Game.Player");
    assert!(reflector.deserialize(&main, &host_object, None).is_err());
}

#[test]
fn collection_elements_keep_their_shape() {
    let (main, _world, reflector) = common::setup();
    let squad = vec![
        Stats {
            hp: 3,
            speed: 1.0,
            team: Team::Red,
        },
        Stats::default(),
    ];

    let node = reflector.serialize(&main, &squad, "squad", true).unwrap();
    let items = node.value.as_ref().and_then(|v| v.as_array()).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], json!("[0]"));
    assert!(items[0]["fields"].is_array());

    let mut back: Vec<Stats> = Vec::new();
    let report = reflector.populate(&main, &mut back, &node);
    assert!(report.is_success(), "{report}");
    assert_eq!(back, squad);
}
