mod common;

use hb_reflect::refs::{DeserializationContext, ObjectRef};
use hb_reflect::{Instance, LogLevel, ObjRef, ReflectErrorKind, SerializedNode};
use serde_json::json;

use common::{Item, Player};

#[test]
fn null_and_destroyed_references_serialize_as_null_descriptor() {
    let (main, world, reflector) = common::setup();
    let shield = world.spawn(Item {
        label: "shield".into(),
    });
    let player = world.spawn(Player {
        inventory: vec![ObjRef::null(), ObjRef::new(&shield)],
        ..Player::named("p")
    });

    world.destroy(shield.id());
    drop(shield);

    let node = reflector.serialize_instance(&main, &player, "p", true).unwrap();
    assert_eq!(
        node.field("inventory").unwrap().value,
        Some(json!([{"instanceID": 0}, {"instanceID": 0}]))
    );
    assert_eq!(
        node.field("companion").unwrap().value,
        Some(json!({"instanceID": 0}))
    );
}

#[test]
fn null_list_elements_are_not_deferred() {
    let (main, world, reflector) = common::setup();
    let source = world.spawn(Player {
        inventory: vec![ObjRef::null()],
        ..Player::named("p")
    });
    let node = reflector.serialize_instance(&main, &source, "p", true).unwrap();

    let copy = world.spawn(Player::named("copy"));
    let report = reflector.populate_instance(&main, &copy, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(report.logs.count_kind(ReflectErrorKind::ReferenceUnresolved), 0);
    copy.with(|p: &Player| {
        assert_eq!(p.inventory.len(), 1);
        assert!(p.inventory[0].is_null());
    })
    .unwrap();
}

#[test]
fn forward_reference_attaches_after_the_walk() {
    let (main, world, reflector) = common::setup();
    let alice = world.spawn(Player::named("Alice"));
    let before = world.object_count();

    // `target` names handle 7 before the `companion` body creates it.
    let node = SerializedNode::new("alice", "Game.Player")
        .with_field(SerializedNode::leaf("target", "Game.Player", json!({"instanceID": 7})))
        .with_field(
            SerializedNode::leaf("companion", "Game.Player", json!({"instanceID": 7}))
                .with_field(SerializedNode::leaf("name", "", json!("Fresh"))),
        );
    let report = reflector.populate_instance(&main, &alice, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(report.logs.count_kind(ReflectErrorKind::ReferenceUnresolved), 0);
    assert_eq!(world.object_count(), before + 1);

    let (target, companion) = alice
        .with(|p: &Player| (p.target.get().unwrap(), p.companion.get().unwrap()))
        .unwrap();
    assert!(target.ptr_eq(&companion));
    assert_eq!(companion.with(|p: &Player| p.name.clone()).unwrap(), "Fresh");
}

#[test]
fn unresolved_reference_is_a_warning() {
    let (main, world, reflector) = common::setup();
    let alice = world.spawn(Player::named("Alice"));

    let node = SerializedNode::new("alice", "Game.Player")
        .with_field(SerializedNode::leaf("target", "Game.Player", json!({"instanceID": 999})));
    let report = reflector.populate_instance(&main, &alice, &node);

    assert!(report.is_success(), "{report}");
    assert_eq!(report.logs.count_kind(ReflectErrorKind::ReferenceUnresolved), 1);
    assert!(alice.with(|p: &Player| p.target.is_null()).unwrap());
}

#[test]
fn references_are_filtered_by_type() {
    let (main, world, reflector) = common::setup();
    let alice = world.spawn(Player::named("Alice"));
    let sword = world.spawn(Item {
        label: "sword".into(),
    });

    let node = SerializedNode::new("alice", "Game.Player")
        .with_field(SerializedNode::leaf("target", "", json!({"instanceID": sword.id()})));
    let report = reflector.populate_instance(&main, &alice, &node);

    assert_eq!(report.logs.count_kind(ReflectErrorKind::ReferenceUnresolved), 1);
    assert!(alice.with(|p: &Player| p.target.is_null()).unwrap());
}

#[test]
fn sub_assets_at_the_same_path_are_searched() {
    let (main, world, reflector) = common::setup();
    let cover = Instance::new(900, Item::default());
    let hero = Instance::new(901, Player::named("Hero"));
    world.store(&cover, "Assets/hero.asset", "g-cover");
    world.store(&hero, "Assets/hero.asset", "g-hero");

    let alice = world.spawn(Player::named("Alice"));
    let node = SerializedNode::new("alice", "Game.Player").with_field(SerializedNode::leaf(
        "target",
        "Game.Player",
        json!({"instanceID": 0, "assetPath": "Assets/hero.asset"}),
    ));
    let report = reflector.populate_instance(&main, &alice, &node);

    assert!(report.is_success(), "{report}");
    assert!(alice.with(|p: &Player| p.target.get().unwrap().ptr_eq(&hero)).unwrap());

    let node = reflector.serialize_instance(&main, &alice, "alice", true).unwrap();
    assert_eq!(
        node.field("target").unwrap().value,
        Some(json!({"instanceID": 901, "assetPath": "Assets/hero.asset", "assetGuid": "g-hero"}))
    );
}

#[test]
fn context_entries_take_precedence() {
    let (main, world, reflector) = common::setup();
    let outsider = Instance::new(0, Player::named("Outsider"));
    let mut context = DeserializationContext::new();
    context.register(&outsider, &ObjectRef::NULL.with_asset_guid("g-outsider"));

    let alice = world.spawn(Player::named("Alice"));
    let node = SerializedNode::new("alice", "Game.Player")
        .with_field(SerializedNode::leaf("target", "", json!({"assetGuid": "g-outsider"})));
    let report = reflector.populate_instance_with_context(&main, &alice, &node, &mut context);

    assert!(report.is_success(), "{report}");
    assert!(alice.with(|p: &Player| p.target.get().unwrap().ptr_eq(&outsider)).unwrap());
}

#[test]
fn member_lists_inside_a_reference_value_are_moved_out() {
    let (main, world, reflector) = common::setup();
    let bob = world.spawn(Player::named("Bob"));
    let alice = world.spawn(Player::named("Alice"));

    let node = SerializedNode::new("alice", "Game.Player").with_field(SerializedNode::leaf(
        "companion",
        "Game.Player",
        json!({
            "instanceID": bob.id(),
            "fields": [{ "name": "name", "value": "Bobby" }],
        }),
    ));
    let report = reflector.populate_instance(&main, &alice, &node);

    assert!(report.is_success(), "{report}");
    assert!(report.logs.iter().any(|e| e.level == LogLevel::Warning));
    assert!(alice.with(|p: &Player| p.companion.get().unwrap().ptr_eq(&bob)).unwrap());
    assert_eq!(bob.with(|p: &Player| p.name.clone()).unwrap(), "Bobby");
}

#[test]
fn node_keys_inside_a_reference_value_are_rejected() {
    let (main, world, reflector) = common::setup();
    let bob = world.spawn(Player::named("Bob"));
    let alice = world.spawn(Player {
        companion: ObjRef::new(&bob),
        ..Player::named("Alice")
    });

    let node = SerializedNode::new("alice", "Game.Player").with_field(SerializedNode::leaf(
        "companion",
        "Game.Player",
        json!({"instanceID": 0, "name": "Carol"}),
    ));
    let report = reflector.populate_instance(&main, &alice, &node);

    assert!(!report.is_success());
    assert!(report.logs.has_errors());
    assert!(alice.with(|p: &Player| p.companion.get().unwrap().ptr_eq(&bob)).unwrap());
}
