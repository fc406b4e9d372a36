//! Sub-stepping for high-velocity movers.
//!
//! A projectile crossing several rooms in one tick must not skip the
//! checks a slower mover would run, so large displacements are cut into
//! fixed-size increments and each one goes through the full resolution
//! pass, carrying zone and layer state forward.

use glam::IVec2;

use morgrim_core::math::dist2;
use morgrim_core::ZoneMap;

use crate::config::{MAX_SUB_STEPS, SUB_STEP_LEN};

use super::context::MoveContext;
use super::resolver::resolve_move;

/// Resolve a movement request in bounded increments.
///
/// The first zone transition ends the tick's stepping (one transition per
/// tick) and arms the vacated zone as the no-return guard for the next
/// call; a completed tick without a transition clears the guard.
/// Displacement beyond `MAX_SUB_STEPS * SUB_STEP_LEN` is dropped.
pub fn step_move(map: &ZoneMap, ctx: &mut MoveContext) -> bool {
    let delta = ctx.delta();
    let dist = dist2(ctx.old_pos, ctx.new_pos);
    let step_len = (SUB_STEP_LEN as i64) << ctx.scale_shift;

    if dist <= step_len {
        let start_zone = ctx.zone;
        let hit = resolve_move(map, ctx);
        ctx.no_return = (ctx.zone != start_zone).then_some(start_zone);
        return hit;
    }

    let origin = ctx.old_pos;
    let mut current = origin;
    let mut hit = false;

    for i in 1..=MAX_SUB_STEPS as i64 {
        let along = (i * step_len).min(dist);
        let target = IVec2::new(
            origin.x + (delta.x as i64 * along / dist) as i32,
            origin.y + (delta.y as i64 * along / dist) as i32,
        );

        let zone_before = ctx.zone;
        ctx.old_pos = current;
        ctx.new_pos = target;
        hit |= resolve_move(map, ctx);

        if ctx.zone != zone_before {
            ctx.no_return = Some(zone_before);
            ctx.old_pos = origin;
            ctx.hit = hit;
            return hit;
        }
        if hit && ctx.new_pos == ctx.old_pos {
            // Rejected slide: the mover is stuck for this tick.
            break;
        }
        current = ctx.new_pos;
        if along == dist {
            break;
        }
    }

    ctx.no_return = None;
    ctx.old_pos = origin;
    ctx.new_pos = current;
    ctx.hit = hit;
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use morgrim_core::level::test_level::{open_arena, two_rooms};
    use morgrim_core::ZoneId;

    fn ctx_run(map_zone: ZoneId, from: IVec2, to: IVec2) -> MoveContext {
        let mut ctx = MoveContext::new(from, map_zone);
        ctx.request(to);
        ctx
    }

    #[test]
    fn long_run_reaches_the_goal() {
        let (map, zone) = open_arena();
        let mut ctx = ctx_run(zone, IVec2::new(100, 500), IVec2::new(900, 500));
        let hit = step_move(&map, &mut ctx);
        assert!(!hit);
        assert_eq!(ctx.new_pos, IVec2::new(900, 500));
        assert_eq!(ctx.old_pos, IVec2::new(100, 500));
        assert_eq!(ctx.no_return, None);
    }

    #[test]
    fn transition_ends_the_tick_and_arms_no_return() {
        let (map, a, b) = two_rooms(0);
        let mut ctx = ctx_run(a, IVec2::new(900, 500), IVec2::new(1500, 500));
        let hit = step_move(&map, &mut ctx);
        assert!(!hit);
        assert_eq!(ctx.zone, b);
        assert_eq!(ctx.no_return, Some(a));
        // Stepping stopped at the increment that crossed; the rest of the
        // displacement is gone for this tick.
        assert!(ctx.new_pos.x < 1500, "got {}", ctx.new_pos.x);
        assert!(ctx.new_pos.x > 1000);
    }

    #[test]
    fn stale_no_return_is_cleared_without_transition() {
        let (map, a, b) = two_rooms(0);
        let mut ctx = ctx_run(a, IVec2::new(500, 500), IVec2::new(300, 500));
        ctx.no_return = Some(b);
        step_move(&map, &mut ctx);
        assert_eq!(ctx.no_return, None);
        assert_eq!(ctx.new_pos, IVec2::new(300, 500));
    }

    #[test]
    fn increment_cap_drops_excess_displacement() {
        let (map, zone) = open_arena();
        let mut ctx = ctx_run(zone, IVec2::new(10, 10), IVec2::new(990, 990));
        let hit = step_move(&map, &mut ctx);
        assert!(!hit);
        // 16 increments of 64 units along a 1385-unit diagonal.
        assert_eq!(ctx.new_pos, IVec2::new(734, 734));
    }

    #[test]
    fn slides_along_walls_across_increments() {
        let (map, zone) = open_arena();
        let mut ctx = ctx_run(zone, IVec2::new(950, 100), IVec2::new(1100, 500));
        let hit = step_move(&map, &mut ctx);
        assert!(hit);
        assert_eq!(ctx.new_pos, IVec2::new(1000, 500));
        assert!(map.contains(zone, ctx.new_pos, 0));
    }
}
