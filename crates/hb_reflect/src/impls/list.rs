use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use super::GenericTypeInfoCell;
use crate::info::{ListInfo, TypeInfo, TypeKind, Typed};
use crate::reflection::Reflect;

fn len<T: Typed + Clone>(list: &dyn Reflect) -> usize {
    list.downcast_ref::<Vec<T>>().map_or(0, Vec::len)
}

fn get<T: Typed + Clone>(list: &dyn Reflect, index: usize) -> Option<Box<dyn Reflect>> {
    let item = list.downcast_ref::<Vec<T>>()?.get(index)?;
    Some(Box::new(item.clone()))
}

fn set<T: Typed + Clone>(
    list: &mut dyn Reflect,
    index: usize,
    value: Box<dyn Reflect>,
) -> Result<(), Box<dyn Reflect>> {
    let Some(slot) = list.downcast_mut::<Vec<T>>().and_then(|v| v.get_mut(index)) else {
        return Err(value);
    };
    slot.set(value)
}

fn from_items<T: Typed + Clone>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let mut list = Vec::<T>::with_capacity(items.len());
    for item in items {
        if !item.is::<T>() {
            return Err(item);
        }
        list.extend(item.take::<T>());
    }
    Ok(Box::new(list))
}

impl<T: Typed + Clone> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let path = format!("alloc::vec::Vec<{}>", T::type_info().type_path());
            let info = ListInfo::new(T::type_info, len::<T>, get::<T>, set::<T>, from_items::<T>);
            TypeInfo::new::<Self>(Box::leak(path.into_boxed_str()), TypeKind::List(info))
                .with_default::<Self>()
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
