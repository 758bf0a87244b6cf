// crates/engine_ecs/src/entity.rs
use std::fmt;

// A handle to a pooled object.
// Bits 0-31: Index (The slot in the pool)
// Bits 32-63: Generation (The version of this slot)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u64,
}

impl Entity {
    const INDEX_MASK: u64 = 0xFFFFFFFF;
    const GENERATION_SHIFT: u64 = 32;

    /// "No object". Never handed out by a pool.
    pub const NULL: Entity = Entity { id: u64::MAX };

    pub fn new(index: u32, generation: u32) -> Self {
        let id = (index as u64) | ((generation as u64) << Self::GENERATION_SHIFT);
        Self { id }
    }

    pub fn index(&self) -> usize {
        (self.id & Self::INDEX_MASK) as usize
    }

    pub fn generation(&self) -> u32 {
        (self.id >> Self::GENERATION_SHIFT) as u32
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Raw packed value, handy for logging and hashing across crates.
    pub fn to_bits(&self) -> u64 {
        self.id
    }

    pub fn from_bits(id: u64) -> Self {
        Self { id }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}:{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_index_and_generation() {
        let e = Entity::new(7, 3);
        assert_eq!(e.index(), 7);
        assert_eq!(e.generation(), 3);
        assert_eq!(Entity::from_bits(e.to_bits()), e);
        assert_ne!(Entity::new(7, 4), e);
    }

    #[test]
    fn null_is_default() {
        assert!(Entity::default().is_null());
        assert!(!Entity::new(0, 0).is_null());
        assert_eq!(format!("{:?}", Entity::NULL), "Entity(null)");
        assert_eq!(format!("{:?}", Entity::new(2, 1)), "Entity(2:1)");
    }
}
