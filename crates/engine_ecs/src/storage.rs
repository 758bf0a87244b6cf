// crates/engine_ecs/src/storage.rs
//! Allocation-bounded containers: a generational object pool and a
//! fixed-capacity array.

use tracing::debug;

use crate::{EcsError, Entity};

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena of reusable slots addressed by `Entity`.
///
/// Slots are created lazily up to `capacity` and never beyond it. Releasing a
/// slot bumps its generation, so a handle kept past release no longer
/// resolves even after the slot is handed out again.
pub struct ObjectPool<T> {
    slots: Vec<Slot<T>>,
    free_indices: Vec<u32>,
    capacity: usize,
    live: usize,
}

impl<T> ObjectPool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_indices: Vec::new(),
            capacity,
            live: 0,
        }
    }

    /// Store `value` in a free slot and return its handle.
    pub fn allocate(&mut self, value: T) -> Result<Entity, EcsError> {
        let index = if let Some(idx) = self.free_indices.pop() {
            idx
        } else if self.slots.len() < self.capacity {
            self.slots.push(Slot {
                generation: 0,
                value: None,
            });
            (self.slots.len() - 1) as u32
        } else {
            return Err(EcsError::PoolExhausted {
                capacity: self.capacity,
            });
        };

        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.live += 1;
        Ok(Entity::new(index, slot.generation))
    }

    /// Take the value out and make the slot reusable. Stale or unknown
    /// handles return `None` and change nothing.
    pub fn release(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot_mut(entity)?;
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_indices.push(entity.index() as u32);
        self.live -= 1;
        debug!(?entity, "pool slot released");
        value
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let slot = self.slots.get(entity.index())?;
        if slot.generation != entity.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot_mut(entity)?.value.as_mut()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over (Entity, value) pairs of live slots.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.value
                .as_ref()
                .map(|v| (Entity::new(idx as u32, slot.generation), v))
        })
    }

    /// Release every live slot, returning the values so the caller can tear
    /// them down.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.live);
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot.value.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_indices.push(idx as u32);
                out.push(value);
            }
        }
        self.live = 0;
        out
    }

    fn slot_mut(&mut self, entity: Entity) -> Option<&mut Slot<T>> {
        let slot = self.slots.get_mut(entity.index())?;
        if slot.generation != entity.generation() || slot.value.is_none() {
            return None;
        }
        Some(slot)
    }
}

/// A Vec that refuses to grow past the capacity it was created with.
/// Per-frame queues use it so a runaway producer cannot allocate without
/// bound.
#[derive(Debug, Clone)]
pub struct FixedArray<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> FixedArray<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, handing the value back when full.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.items.len() >= self.capacity {
            return Err(value);
        }
        self.items.push(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove everything, keeping the allocation.
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.items.drain(..)
    }

    /// Remove the first element matching `pred`, preserving order.
    pub fn remove_first(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let idx = self.items.iter().position(pred)?;
        Some(self.items.remove(idx))
    }
}
