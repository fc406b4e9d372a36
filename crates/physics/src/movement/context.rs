//! Per-call movement context.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use morgrim_core::{ClassMask, EntityId, Mover, MoverClass, ZoneId};

use crate::config::{DEFAULT_STEP_UP, UNLIMITED_DROP};

/// Everything the resolver needs for one movement request.
///
/// A context is transient: build one per call, read the results, throw it
/// away. `new_pos`, `zone`, `in_upper`, `hit` and `hit_entity` are rewritten
/// in place and carry the resolved state back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveContext {
    /// Position at the start of the tick, fine units.
    pub old_pos: IVec2,
    /// Requested position; the resolver rewrites this to the resolved one.
    pub new_pos: IVec2,
    /// Vertical position of the feet, fine units.
    pub y: i32,
    /// Zone the mover occupies; updated on committed transitions.
    pub zone: ZoneId,
    /// Which band of a two-layer zone the mover occupies.
    pub in_upper: bool,
    /// Maximum floor rise crossable through a portal, fine units.
    pub step_up: i32,
    /// Maximum floor drop crossable through a portal, fine units.
    pub step_down: i32,
    /// Body height for clearance checks, fine units.
    pub height: i32,
    /// Planar half-extent used by the object checker, fine units.
    pub extent: i32,
    /// Players slide flush along walls; everyone else is pushed off them.
    pub is_player: bool,
    /// Accept out-of-range slides on short segments (stair climbing).
    pub must_progress: bool,
    /// Transitions back into this zone are refused for this call.
    pub no_return: Option<ZoneId>,
    /// Fixed-point precision: positions are base map units << scale_shift.
    pub scale_shift: u8,
    /// Entity skipped by the object scan.
    pub self_id: Option<EntityId>,
    /// Classes the object checker treats as obstacles.
    pub obstacle_mask: ClassMask,
    /// Set when the move was obstructed.
    pub hit: bool,
    /// The entity that stopped the move, when the object checker hit one.
    pub hit_entity: Option<EntityId>,
}

impl MoveContext {
    /// A minimal context at `pos` in `zone`, base precision, player rules.
    pub fn new(pos: IVec2, zone: ZoneId) -> Self {
        Self {
            old_pos: pos,
            new_pos: pos,
            y: 0,
            zone,
            in_upper: false,
            step_up: DEFAULT_STEP_UP,
            step_down: UNLIMITED_DROP,
            height: Mover::DEFAULT_HEIGHT,
            extent: MoverClass::Player.half_width(),
            is_player: true,
            must_progress: false,
            no_return: None,
            scale_shift: 0,
            self_id: None,
            obstacle_mask: ClassMask::MASK_WALKERS,
            hit: false,
            hit_entity: None,
        }
    }

    /// Build a context from a mover record. Creatures and props get the
    /// symmetric step tolerance (they refuse ledge drops); players and
    /// projectiles fall freely.
    pub fn for_mover(mover: &Mover) -> Self {
        let shift = mover.scale_shift;
        let step_up = DEFAULT_STEP_UP << shift;
        let step_down = match mover.class {
            MoverClass::Creature | MoverClass::Prop => step_up,
            MoverClass::Player | MoverClass::Projectile => UNLIMITED_DROP,
        };
        Self {
            old_pos: mover.pos,
            new_pos: mover.pos,
            y: mover.y,
            zone: mover.zone,
            in_upper: mover.in_upper,
            step_up,
            step_down,
            height: mover.height,
            extent: mover.class.half_width() << shift,
            is_player: matches!(mover.class, MoverClass::Player),
            must_progress: false,
            no_return: None,
            scale_shift: shift,
            self_id: Some(mover.id),
            obstacle_mask: ClassMask::MASK_WALKERS,
            hit: false,
            hit_entity: None,
        }
    }

    /// Set the requested target position.
    pub fn request(&mut self, target: IVec2) -> &mut Self {
        self.new_pos = target;
        self
    }

    /// Requested displacement for this call.
    #[inline]
    pub fn delta(&self) -> IVec2 {
        self.new_pos - self.old_pos
    }

    /// Write the resolved state back to a mover record.
    pub fn commit_to(&self, mover: &mut Mover) {
        mover.pos = self.new_pos;
        mover.y = self.y;
        mover.zone = self.zone;
        mover.in_upper = self.in_upper;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_mover_step_tolerances_by_class() {
        let mut m = Mover::new(EntityId(1), MoverClass::Creature, IVec2::ZERO, ZoneId(0));
        let ctx = MoveContext::for_mover(&m);
        assert_eq!(ctx.step_down, ctx.step_up);
        assert!(!ctx.is_player);

        m.class = MoverClass::Player;
        let ctx = MoveContext::for_mover(&m);
        assert_eq!(ctx.step_down, UNLIMITED_DROP);
        assert!(ctx.is_player);
    }

    #[test]
    fn for_mover_scales_with_precision() {
        let mut m = Mover::new(EntityId(1), MoverClass::Projectile, IVec2::ZERO, ZoneId(0));
        m.scale_shift = 4;
        let ctx = MoveContext::for_mover(&m);
        assert_eq!(ctx.step_up, DEFAULT_STEP_UP << 4);
        assert_eq!(ctx.extent, MoverClass::Projectile.half_width() << 4);
    }

    #[test]
    fn commit_round_trip() {
        let mut m = Mover::new(EntityId(1), MoverClass::Player, IVec2::new(10, 20), ZoneId(0));
        let mut ctx = MoveContext::for_mover(&m);
        ctx.request(IVec2::new(30, 40));
        ctx.new_pos = IVec2::new(25, 35);
        ctx.zone = ZoneId(2);
        ctx.in_upper = true;
        ctx.commit_to(&mut m);
        assert_eq!(m.pos, IVec2::new(25, 35));
        assert_eq!(m.zone, ZoneId(2));
        assert!(m.in_upper);
    }
}
