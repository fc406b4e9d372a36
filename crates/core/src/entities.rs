//! Mover records and storage.
//!
//! Uses simple array-based storage for deterministic iteration order.
//! No hashmaps or sets - the object collision scan must visit candidates in
//! the same order on every run.

use bincode::{Decode, Encode};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::level::ZoneId;

/// Unique identifier for a mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct EntityId(pub u32);

/// Broad gameplay class of a mover.
///
/// The class decides the planar collision footprint and which obstacle
/// masks the mover shows up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum MoverClass {
    Player,
    Creature,
    Projectile,
    Prop,
}

impl MoverClass {
    /// Planar half-width of the collision square, in base map units.
    pub fn half_width(self) -> i32 {
        match self {
            MoverClass::Player => 24,
            MoverClass::Creature => 28,
            MoverClass::Projectile => 4,
            MoverClass::Prop => 20,
        }
    }

    /// The mask bit for this class.
    pub fn mask(self) -> ClassMask {
        match self {
            MoverClass::Player => ClassMask::PLAYER,
            MoverClass::Creature => ClassMask::CREATURE,
            MoverClass::Projectile => ClassMask::PROJECTILE,
            MoverClass::Prop => ClassMask::PROP,
        }
    }
}

/// Bitmask over mover classes, used to filter object collision scans.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub struct ClassMask(pub u8);

impl ClassMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);

    /// Player avatars.
    pub const PLAYER: Self = Self(1 << 0);

    /// AI-driven creatures.
    pub const CREATURE: Self = Self(1 << 1);

    /// Projectiles in flight.
    pub const PROJECTILE: Self = Self(1 << 2);

    /// Static-ish props (barrels, pickups with a body).
    pub const PROP: Self = Self(1 << 3);

    /// Everything; teleport destination probes use this.
    pub const ALL: Self = Self(Self::PLAYER.0 | Self::CREATURE.0 | Self::PROJECTILE.0 | Self::PROP.0);

    /// The usual obstacle set for walking movers.
    pub const MASK_WALKERS: Self = Self(Self::PLAYER.0 | Self::CREATURE.0 | Self::PROP.0);

    /// Check if all of the given bits are set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given bits are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ClassMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ClassMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// A mobile entity as the resolver sees it.
///
/// The resolver never owns mover lifecycle; it reads and writes position,
/// zone membership and the layer flag through a `MoveContext`, and the
/// object checker reads the rest.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct Mover {
    pub id: EntityId,
    pub class: MoverClass,
    /// Planar position in this mover's fine units (base << scale_shift).
    #[bincode(with_serde)]
    pub pos: IVec2,
    /// Vertical position of the feet, fine units.
    pub y: i32,
    /// Body height, fine units.
    pub height: i32,
    /// Facing as a binary angle.
    pub facing: i32,
    /// Per-tick planar velocity, fine units.
    #[bincode(with_serde)]
    pub velocity: IVec2,
    /// Zone membership; updated only by the resolver.
    pub zone: ZoneId,
    /// Which band of a two-layer zone the mover occupies.
    pub in_upper: bool,
    /// Fixed-point precision of this mover's coordinates.
    pub scale_shift: u8,
    pub active: bool,
    pub health: i32,
}

impl Mover {
    /// Default body height in base map units.
    pub const DEFAULT_HEIGHT: i32 = 56;

    pub fn new(id: EntityId, class: MoverClass, pos: IVec2, zone: ZoneId) -> Self {
        Self {
            id,
            class,
            pos,
            y: 0,
            height: Self::DEFAULT_HEIGHT,
            facing: 0,
            velocity: IVec2::ZERO,
            zone,
            in_upper: false,
            scale_shift: 0,
            active: true,
            health: 1,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Array-backed mover storage with stable, deterministic iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Encode, Decode)]
pub struct MoverList {
    movers: Vec<Mover>,
}

impl MoverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mover: Mover) {
        self.movers.push(mover);
    }

    pub fn get(&self, id: EntityId) -> Option<&Mover> {
        self.movers.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Mover> {
        self.movers.iter_mut().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mover> {
        self.movers.iter()
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_mask_operations() {
        let walkers = ClassMask::MASK_WALKERS;
        assert!(walkers.contains(ClassMask::PLAYER));
        assert!(walkers.contains(ClassMask::CREATURE));
        assert!(!walkers.contains(ClassMask::PROJECTILE));
        assert!(walkers.intersects(ClassMask::PLAYER | ClassMask::PROJECTILE));
        assert!(!walkers.intersects(ClassMask::PROJECTILE));
        assert!(ClassMask::ALL.contains(walkers));
    }

    #[test]
    fn class_widths_ordered() {
        // Projectiles are the slimmest footprint, creatures the widest.
        assert!(MoverClass::Projectile.half_width() < MoverClass::Player.half_width());
        assert!(MoverClass::Player.half_width() <= MoverClass::Creature.half_width());
    }

    #[test]
    fn mover_list_lookup_and_order() {
        let mut list = MoverList::new();
        for i in 0..4 {
            list.push(Mover::new(
                EntityId(i),
                MoverClass::Creature,
                IVec2::new(i as i32 * 10, 0),
                ZoneId(0),
            ));
        }
        assert_eq!(list.len(), 4);
        assert_eq!(list.get(EntityId(2)).unwrap().pos.x, 20);
        assert!(list.get(EntityId(9)).is_none());

        let order: Vec<u32> = list.iter().map(|m| m.id.0).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn dead_movers_report_not_alive() {
        let mut m = Mover::new(EntityId(1), MoverClass::Creature, IVec2::ZERO, ZoneId(0));
        assert!(m.is_alive());
        m.health = 0;
        assert!(!m.is_alive());
    }
}
