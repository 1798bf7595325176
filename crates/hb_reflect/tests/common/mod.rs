#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::rc::Rc;

use hb_reflect::impls::TypeInfoCell;
use hb_reflect::info::{MemberFlags, MemberInfo, TypeInfo, Typed};
use hb_reflect::refs::{HostHooks, ObjectRef};
use hb_reflect::wire::{Color, Vector3};
use hb_reflect::{Instance, MainThread, ObjRef, Reflect, Reflector};

// -----------------------------------------------------------------------------
// Types

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Team {
    #[default]
    Red,
    Blue,
}

hb_reflect::impl_reflect_enum!(Team, "Game.Team", [Red, Blue]);

/// Plain data, walked member by member.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub hp: i32,
    pub speed: f32,
    pub team: Team,
}

impl Typed for Stats {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::composite::<Self>("Game.Stats")
                .with_default::<Self>()
                .with_field(MemberInfo::field::<Self, i32>("hp", |s| &s.hp, |s| &mut s.hp))
                .with_field(MemberInfo::field::<Self, f32>("speed", |s| &s.speed, |s| &mut s.speed))
                .with_field(MemberInfo::field::<Self, Team>("team", |s| &s.team, |s| &mut s.team))
        })
    }
}

/// A host object with a single field.
#[derive(Clone, Debug, Default)]
pub struct Item {
    pub label: String,
}

impl Typed for Item {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::object::<Self>("Game.Item")
                .with_default::<Self>()
                .with_field(MemberInfo::field::<Self, String>(
                    "label",
                    |i| &i.label,
                    |i| &mut i.label,
                ))
        })
    }
}

/// A host object exercising every kind of member.
#[derive(Clone, Debug, Default)]
pub struct Player {
    pub name: String,
    pub stats: Stats,
    pub position: Vector3,
    pub tint: Color,
    pub target: ObjRef<Player>,
    pub companion: ObjRef<Player>,
    pub inventory: Vec<ObjRef<Item>>,
    pub tags: Vec<String>,
    pub secret: i32,
    pub transform: Vector3,
    pub nick: String,
}

impl Player {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Typed for Player {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::object::<Self>("Game.Player")
                .with_default::<Self>()
                .with_field(MemberInfo::field::<Self, String>("name", |p| &p.name, |p| &mut p.name))
                .with_field(MemberInfo::field::<Self, Stats>("stats", |p| &p.stats, |p| &mut p.stats))
                .with_field(MemberInfo::field::<Self, Vector3>(
                    "position",
                    |p| &p.position,
                    |p| &mut p.position,
                ))
                .with_field(MemberInfo::field::<Self, Color>("tint", |p| &p.tint, |p| &mut p.tint))
                .with_field(MemberInfo::field::<Self, ObjRef<Player>>(
                    "target",
                    |p| &p.target,
                    |p| &mut p.target,
                ))
                .with_field(MemberInfo::field::<Self, ObjRef<Player>>(
                    "companion",
                    |p| &p.companion,
                    |p| &mut p.companion,
                ))
                .with_field(MemberInfo::field::<Self, Vec<ObjRef<Item>>>(
                    "inventory",
                    |p| &p.inventory,
                    |p| &mut p.inventory,
                ))
                .with_field(MemberInfo::field::<Self, Vec<String>>("tags", |p| &p.tags, |p| &mut p.tags))
                .with_field(
                    MemberInfo::field::<Self, i32>("secret", |p| &p.secret, |p| &mut p.secret)
                        .with_flags(MemberFlags::NON_SERIALIZED),
                )
                .with_field(MemberInfo::field::<Self, Vector3>(
                    "transform",
                    |p| &p.transform,
                    |p| &mut p.transform,
                ))
                .with_property(MemberInfo::property::<Self, i32>("level", |p| p.stats.hp / 10))
                .with_property(
                    MemberInfo::property::<Self, String>("nickname", |p| p.nick.clone())
                        .with_setter::<Self, String>(|p, v| p.nick = v),
                )
        })
    }
}

// -----------------------------------------------------------------------------
// World

#[derive(Default)]
struct Asset {
    path: String,
    guid: String,
    instance: Option<Instance>,
}

#[derive(Default)]
struct State {
    objects: Vec<Instance>,
    assets: Vec<Asset>,
    next_id: i64,
}

/// An in-memory host: owns the live objects and answers the lookups.
#[derive(Clone, Default)]
pub struct World(Rc<RefCell<State>>);

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        100 + state.next_id
    }

    pub fn spawn<T: Reflect>(&self, value: T) -> Instance {
        let instance = Instance::new(self.next_id(), value);
        self.0.borrow_mut().objects.push(instance.clone());
        instance
    }

    /// Stores `instance` at `path`; the first object stored at a path is its
    /// main object.
    pub fn store(&self, instance: &Instance, path: &str, guid: &str) {
        self.0.borrow_mut().assets.push(Asset {
            path: path.into(),
            guid: guid.into(),
            instance: Some(instance.clone()),
        });
    }

    /// Drops the world's handle on the object with handle `id`.
    pub fn destroy(&self, id: i64) {
        let mut state = self.0.borrow_mut();
        state.objects.retain(|o| o.id() != id);
        for asset in &mut state.assets {
            if asset.instance.as_ref().is_some_and(|o| o.id() == id) {
                asset.instance = None;
            }
        }
    }

    pub fn object_count(&self) -> usize {
        self.0.borrow().objects.len()
    }

    fn find_asset(&self, f: impl Fn(&Asset) -> bool) -> Option<Instance> {
        let state = self.0.borrow();
        state
            .assets
            .iter()
            .filter(|a| f(a))
            .find_map(|a| a.instance.clone())
    }
}

impl HostHooks for World {
    fn resolve_by_handle(&self, instance_id: i64) -> Option<Instance> {
        let state = self.0.borrow();
        state.objects.iter().find(|o| o.id() == instance_id).cloned()
    }

    fn resolve_by_path(&self, path: &str, _: &TypeInfo) -> Option<Instance> {
        self.find_asset(|a| a.path == path)
    }

    fn resolve_by_content_id(&self, guid: &str, _: &TypeInfo) -> Option<Instance> {
        self.find_asset(|a| a.guid == guid)
    }

    fn sub_assets_at(&self, path: &str) -> Vec<Instance> {
        let state = self.0.borrow();
        state
            .assets
            .iter()
            .filter(|a| a.path == path)
            .filter_map(|a| a.instance.clone())
            .collect()
    }

    fn path_of_content_id(&self, guid: &str) -> Option<String> {
        let state = self.0.borrow();
        state
            .assets
            .iter()
            .find(|a| a.guid == guid)
            .map(|a| a.path.clone())
    }

    fn asset_path_of(&self, instance: &Instance) -> Option<String> {
        let state = self.0.borrow();
        state
            .assets
            .iter()
            .find(|a| a.instance.as_ref().is_some_and(|o| o.ptr_eq(instance)))
            .map(|a| a.path.clone())
    }

    fn content_id_of(&self, instance: &Instance) -> Option<String> {
        let state = self.0.borrow();
        state
            .assets
            .iter()
            .find(|a| a.instance.as_ref().is_some_and(|o| o.ptr_eq(instance)))
            .map(|a| a.guid.clone())
    }

    fn instantiate(&self, ty: &'static TypeInfo, _: &ObjectRef) -> Option<Instance> {
        let value = ty.default_value()?;
        let instance = Instance::from_boxed(self.next_id(), value);
        self.0.borrow_mut().objects.push(instance.clone());
        Some(instance)
    }
}

// -----------------------------------------------------------------------------
// Setup

pub fn setup() -> (MainThread, World, Reflector) {
    let world = World::new();
    let mut reflector = Reflector::new(world.clone());
    reflector.register_type::<Player>().register_type::<Stats>();
    (MainThread::current(), world, reflector)
}
