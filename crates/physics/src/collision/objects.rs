//! Object-vs-object collision: a linear scan over the mover list.
//!
//! Mover counts are small enough that a straight scan in storage order
//! beats any index, and the fixed order keeps results deterministic.

use morgrim_core::math::{dist2_sq, rescale};
use morgrim_core::MoverList;

use crate::movement::MoveContext;

/// Test the context's requested position against every other active mover.
///
/// Read-only against geometry and the mover list; mutates only the
/// context's hit flag and hit entity. The first hit stops the scan.
///
/// A candidate must overlap vertically (the moving body spans `[y, y +
/// height]`; an obstacle's span is centered on its own vertical position,
/// leaving slack below the feet), overlap a Chebyshev box built from the
/// per-class widths, and survive the moving-closer tie-break:
/// once two bodies already overlap, a step that strictly increases their
/// separation never counts as a hit, so they can always disentangle.
pub fn check_object_collision(ctx: &mut MoveContext, movers: &MoverList) -> bool {
    ctx.hit = false;
    ctx.hit_entity = None;

    let shift = ctx.scale_shift;
    for other in movers.iter() {
        if Some(other.id) == ctx.self_id {
            continue;
        }
        if !other.active || !other.is_alive() {
            continue;
        }
        if !ctx.obstacle_mask.intersects(other.class.mask()) {
            continue;
        }
        if other.in_upper != ctx.in_upper {
            continue;
        }

        let other_y = rescale(other.y, other.scale_shift, shift);
        let other_half = rescale(other.height, other.scale_shift, shift) / 2;
        if ((ctx.y + ctx.height) as i64) < other_y - other_half
            || (ctx.y as i64) > other_y + other_half
        {
            continue;
        }

        let ox = rescale(other.pos.x, other.scale_shift, shift);
        let oz = rescale(other.pos.y, other.scale_shift, shift);
        let radius = ctx.extent as i64 + ((other.class.half_width() as i64) << shift);
        let dx = (ctx.new_pos.x as i64 - ox).abs();
        let dz = (ctx.new_pos.y as i64 - oz).abs();
        if dx.max(dz) >= radius {
            continue;
        }

        let other_pos = glam::IVec2::new(ox as i32, oz as i32);
        if dist2_sq(ctx.new_pos, other_pos) > dist2_sq(ctx.old_pos, other_pos) {
            continue;
        }

        ctx.hit = true;
        ctx.hit_entity = Some(other.id);
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use morgrim_core::{ClassMask, EntityId, Mover, MoverClass, ZoneId};

    fn obstacle(id: u32, x: i32, z: i32) -> Mover {
        let mut m = Mover::new(EntityId(id), MoverClass::Creature, IVec2::new(x, z), ZoneId(0));
        m.height = 56;
        m
    }

    fn ctx_at(old: IVec2, new: IVec2) -> MoveContext {
        let mut ctx = MoveContext::new(old, ZoneId(0));
        ctx.new_pos = new;
        ctx.self_id = Some(EntityId(0));
        ctx
    }

    #[test]
    fn approach_into_box_hits() {
        let mut movers = MoverList::new();
        movers.push(obstacle(1, 100, 0));
        // Player half-width 24 + creature 28 = 52.
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(60, 0));
        assert!(check_object_collision(&mut ctx, &movers));
        assert_eq!(ctx.hit_entity, Some(EntityId(1)));
    }

    #[test]
    fn wide_miss_is_clear() {
        let mut movers = MoverList::new();
        movers.push(obstacle(1, 100, 100));
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(40, 0));
        assert!(!check_object_collision(&mut ctx, &movers));
        assert_eq!(ctx.hit_entity, None);
    }

    #[test]
    fn scenario_e_overlapping_may_separate() {
        let mut movers = MoverList::new();
        movers.push(obstacle(1, 10, 0));
        // Already inside the box. Stepping away increases distance: clear.
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(-20, 0));
        assert!(!check_object_collision(&mut ctx, &movers));
        // Stepping closer: hit.
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(5, 0));
        assert!(check_object_collision(&mut ctx, &movers));
        // Holding distance (zero displacement): still a hit.
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(0, 0));
        assert!(check_object_collision(&mut ctx, &movers));
    }

    #[test]
    fn self_is_skipped() {
        let mut movers = MoverList::new();
        movers.push(obstacle(7, 0, 0));
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(1, 0));
        ctx.self_id = Some(EntityId(7));
        assert!(!check_object_collision(&mut ctx, &movers));
    }

    #[test]
    fn dead_and_inactive_are_skipped() {
        let mut movers = MoverList::new();
        let mut dead = obstacle(1, 10, 0);
        dead.health = 0;
        movers.push(dead);
        let mut inactive = obstacle(2, 10, 0);
        inactive.active = false;
        movers.push(inactive);

        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(5, 0));
        assert!(!check_object_collision(&mut ctx, &movers));
    }

    #[test]
    fn class_mask_filters() {
        let mut movers = MoverList::new();
        movers.push(obstacle(1, 10, 0));
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(5, 0));
        ctx.obstacle_mask = ClassMask::PROJECTILE;
        assert!(!check_object_collision(&mut ctx, &movers));
        ctx.obstacle_mask = ClassMask::ALL;
        assert!(check_object_collision(&mut ctx, &movers));
    }

    #[test]
    fn different_layer_is_skipped() {
        let mut movers = MoverList::new();
        let mut upstairs = obstacle(1, 10, 0);
        upstairs.in_upper = true;
        movers.push(upstairs);
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(5, 0));
        assert!(!check_object_collision(&mut ctx, &movers));
    }

    #[test]
    fn vertical_gap_is_clear() {
        let mut movers = MoverList::new();
        let mut high = obstacle(1, 10, 0);
        high.y = 500;
        movers.push(high);
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(5, 0));
        assert!(!check_object_collision(&mut ctx, &movers));
    }

    #[test]
    fn first_hit_in_storage_order_wins() {
        let mut movers = MoverList::new();
        movers.push(obstacle(5, 12, 0));
        movers.push(obstacle(6, 10, 0));
        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(8, 0));
        assert!(check_object_collision(&mut ctx, &movers));
        assert_eq!(ctx.hit_entity, Some(EntityId(5)));
    }

    #[test]
    fn mixed_precision_candidates_line_up() {
        let mut movers = MoverList::new();
        // Obstacle at base x=100 stored at 4-bit finer precision.
        let mut fine = obstacle(1, 100 << 4, 0);
        fine.scale_shift = 4;
        fine.height = 56 << 4;
        fine.y = 0;
        movers.push(fine);

        let mut ctx = ctx_at(IVec2::new(0, 0), IVec2::new(60, 0));
        assert!(check_object_collision(&mut ctx, &movers));
    }
}
