//! Teleporter pads: instant relocation with a destination occupancy check.

use morgrim_core::math::scale_up;
use morgrim_core::{ClassMask, MoverList, ZoneId, ZoneMap};

use crate::collision::check_object_collision;

use super::context::MoveContext;

/// Teleport through the pad of `pad_zone` (normally the zone the mover just
/// stepped into).
///
/// The floor-height delta between the mover's current zone and the
/// destination zone is applied to the vertical position first, then the
/// destination is probed with *every* class treated as an obstacle. A
/// blocked destination undoes the vertical adjustment and reports failure;
/// otherwise position and zone are committed.
pub fn teleport(
    map: &ZoneMap,
    movers: &MoverList,
    ctx: &mut MoveContext,
    pad_zone: ZoneId,
) -> bool {
    let shift = ctx.scale_shift;
    let Some(current) = map.zone(ctx.zone) else {
        ctx.hit = false;
        return false;
    };
    let Some(pad) = map.zone(pad_zone).and_then(|z| z.teleport) else {
        return false;
    };
    let Some(dest_zone) = map.zone(pad.zone) else {
        return false;
    };

    let dest = scale_up(pad.dest, shift);
    let lift = ((dest_zone.band(false).floor as i64 - current.band(ctx.in_upper).floor as i64)
        << shift) as i32;
    ctx.y += lift;

    let mut probe = ctx.clone();
    probe.old_pos = dest;
    probe.new_pos = dest;
    probe.obstacle_mask = ClassMask::ALL;
    if check_object_collision(&mut probe, movers) {
        ctx.y -= lift;
        tracing::debug!(zone = pad.zone.0, "teleport destination blocked");
        return false;
    }

    ctx.old_pos = dest;
    ctx.new_pos = dest;
    ctx.zone = pad.zone;
    ctx.in_upper = match dest_zone.layer_split() {
        Some(split) => ctx.y as i64 >= (split as i64) << shift,
        None => false,
    };
    true
}
