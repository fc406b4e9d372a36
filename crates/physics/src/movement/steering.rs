//! Steering helpers: compute a requested position for the resolver.
//!
//! Both helpers only fill in the context's target; the caller still runs
//! `resolve_move` (and usually `check_object_collision`) afterwards.

use glam::IVec2;

use morgrim_core::math::{
    angle_diff, atan2_bam, cos_bam, dist2, sin_bam, ANGLE_MASK, TRIG_SHIFT,
};

use super::context::MoveContext;

/// Direct approach: aim straight at `target`, clamped to `speed` per tick.
///
/// Distance comes from the constant-iteration integer square root, and a
/// target within reach is snapped to exactly, so a chasing mover lands on
/// its goal instead of orbiting it.
pub fn head_towards(ctx: &mut MoveContext, target: IVec2, speed: i32) {
    let dist = dist2(ctx.old_pos, target);
    if dist <= speed as i64 {
        ctx.new_pos = target;
        return;
    }
    let delta = target - ctx.old_pos;
    ctx.new_pos = IVec2::new(
        ctx.old_pos.x + (delta.x as i64 * speed as i64 / dist) as i32,
        ctx.old_pos.y + (delta.y as i64 * speed as i64 / dist) as i32,
    );
}

/// Turn-rate-limited approach: rotate the facing toward `target` by at
/// most `turn_rate` binary-angle units, then step `speed` units along the
/// new facing. Returns the updated facing.
pub fn head_towards_angle(
    ctx: &mut MoveContext,
    facing: i32,
    target: IVec2,
    speed: i32,
    turn_rate: i32,
) -> i32 {
    let delta = target - ctx.old_pos;
    let desired = atan2_bam(delta.y, delta.x);
    let turn = angle_diff(facing, desired).clamp(-turn_rate, turn_rate);
    let facing = (facing + turn) & ANGLE_MASK;

    ctx.new_pos = IVec2::new(
        ctx.old_pos.x + ((cos_bam(facing) as i64 * speed as i64) >> TRIG_SHIFT) as i32,
        ctx.old_pos.y + ((sin_bam(facing) as i64 * speed as i64) >> TRIG_SHIFT) as i32,
    );
    facing
}
