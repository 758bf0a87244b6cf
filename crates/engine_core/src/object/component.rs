// crates/engine_core/src/object/component.rs

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::object::GameObject;
use crate::registry::SystemRegistry;

/// Ordering bucket. Every active object's `Think` components run before any
/// object's `Physics` components, and so on down the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Think,
    Physics,
    Collision,
    PostCollision,
    Animation,
    Draw,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Think,
        Phase::Physics,
        Phase::Collision,
        Phase::PostCollision,
        Phase::Animation,
        Phase::Draw,
    ];
}

/// A unit of behavior attached to one object.
///
/// While a component runs, its parent's component list is detached, so
/// `parent.find_component` cannot see siblings. Components talk to each other
/// through the parent's fields and to the rest of the world through
/// `systems`.
pub trait GameComponent: Any {
    fn phase(&self) -> Phase;

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry);

    /// Return to the just-constructed state. Must be idempotent.
    fn reset(&mut self);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Spares kept per component type; anything beyond is dropped.
const MAX_SPARES_PER_TYPE: usize = 64;

/// Reset components waiting to be reused, keyed by concrete type.
#[derive(Default)]
pub struct ComponentPool {
    spares: HashMap<TypeId, Vec<Box<dyn GameComponent>>>,
}

impl ComponentPool {
    /// A reset `T` (pooled if available), configured by `configure`.
    pub fn acquire<T: GameComponent + Default>(&mut self, configure: impl FnOnce(&mut T)) -> Box<dyn GameComponent> {
        let mut component = self
            .spares
            .get_mut(&TypeId::of::<T>())
            .and_then(Vec::pop)
            .unwrap_or_else(|| Box::new(T::default()) as Box<dyn GameComponent>);

        match component.as_any_mut().downcast_mut::<T>() {
            Some(concrete) => configure(concrete),
            None => panic!(
                "ComponentPool: spare stored under {} has a different concrete type",
                std::any::type_name::<T>()
            ),
        }
        component
    }

    /// Reset and keep for later.
    pub fn recycle(&mut self, mut component: Box<dyn GameComponent>) {
        component.reset();
        let type_id = Any::type_id(component.as_any());
        let spares = self.spares.entry(type_id).or_default();
        if spares.len() < MAX_SPARES_PER_TYPE {
            spares.push(component);
        }
    }

    pub fn spare_count<T: GameComponent>(&self) -> usize {
        self.spares.get(&TypeId::of::<T>()).map_or(0, Vec::len)
    }
}
