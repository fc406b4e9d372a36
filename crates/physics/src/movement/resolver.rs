//! The zone scan: crossing tests, portal passability, wall slides, and the
//! room finder that commits zone transitions.
//!
//! One call walks a bounded state machine:
//!
//! ```text
//! Scan -> (no crossing: continue)
//!      -> (passable portal: skip, continue)
//!      -> (blocked portal / wall: Slide)
//!      -> (slide accepted: restart Scan)
//!      -> (slide rejected: revert, stop)
//!      -> ScanExhausted -> RoomFinder
//!      -> (zone changed: restart Scan in new zone)
//!      -> (unchanged: Done)
//! ```
//!
//! Every restart edge is capped (see `config`); exhausting a cap settles
//! the mover where it is instead of looping.

use glam::IVec2;

use morgrim_core::level::{FloorLine, Zone, ZoneMap};
use morgrim_core::math::{cross2, dot2, scale_up};

use crate::config::{
    CROSS_END_SLACK, MAX_WALL_PASSES, MAX_ZONE_HOPS, SHORT_WALL_LEN, SLIDE_DRIFT_LIMIT,
};

use super::context::MoveContext;

/// Outcome of testing one directed line against the movement segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    /// The segment stays on one side of the line (on-line counts as the
    /// interior side).
    Clear,
    /// The segment crosses within the finite extent. `from_side` is the
    /// signed side of the start position; the slide uses it to keep the
    /// mover on its original side.
    Crossed { from_side: i64 },
}

/// Cross-product sign test plus finite-segment confirmation.
fn crossing_test(line: &FloorLine, p0: IVec2, p1: IVec2, shift: u8) -> Crossing {
    let len = line.length as i64;
    if len == 0 {
        return Crossing::Clear;
    }
    let origin = scale_up(line.origin, shift);
    let side0 = cross2(line.dir, p0 - origin);
    let side1 = cross2(line.dir, p1 - origin);
    if (side0 >= 0) == (side1 >= 0) {
        return Crossing::Clear;
    }

    // Where the segment meets the infinite line, with truncating integer
    // division.
    let den = side0 - side1;
    let delta = p1 - p0;
    let cx = p0.x as i64 + delta.x as i64 * side0 / den;
    let cz = p0.y as i64 + delta.y as i64 * side0 / den;

    // The crossing point's projection along the line must land on the
    // finite segment, give or take the end slack.
    let proj = (cx - origin.x as i64) * line.dir.x as i64
        + (cz - origin.y as i64) * line.dir.y as i64;
    let slack = (CROSS_END_SLACK as i64) << shift;
    let lo = -slack * len;
    let hi = ((len << shift) + slack) * len;
    if proj < lo || proj > hi {
        return Crossing::Clear;
    }
    Crossing::Crossed { from_side: side0 }
}

/// Can the mover step through a portal from `current` into `target`?
///
/// Both floor deltas use the band the mover currently occupies; the layer
/// flag is only re-derived once a transition commits.
fn portal_passable(ctx: &MoveContext, current: &Zone, target: &Zone) -> bool {
    let shift = ctx.scale_shift;
    let cur = current.band(ctx.in_upper);
    let tgt = target.band(ctx.in_upper);

    let rise = (tgt.floor as i64 - cur.floor as i64) << shift;
    if rise > ctx.step_up as i64 {
        return false;
    }
    if -rise > ctx.step_down as i64 {
        return false;
    }

    let clearance = (tgt.roof as i64 - tgt.floor as i64) << shift;
    clearance >= ctx.height as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slide {
    Accepted(IVec2),
    Rejected,
}

/// Project the requested position onto the wall line and vet the result.
///
/// The movement component parallel to the wall survives; the perpendicular
/// component is dropped. Non-players are then pushed off the line toward
/// the side they came from, scaled by the line's push factor and the
/// mover's precision shift.
fn slide_along(line: &FloorLine, ctx: &MoveContext, from_side: i64) -> Slide {
    let shift = ctx.scale_shift;
    let len = line.length as i64;
    let len_sq = len * len;
    if len_sq == 0 {
        return Slide::Rejected;
    }
    let origin = scale_up(line.origin, shift);

    let mut proj = dot2(ctx.new_pos - origin, line.dir);
    let span = len_sq << shift;
    if proj < 0 || proj > span {
        // Past an endpoint. Stair risers and other short walls refuse the
        // slide outright; long walls clamp to the corner.
        if (line.length as i64) < SHORT_WALL_LEN as i64 && !ctx.must_progress {
            return Slide::Rejected;
        }
        proj = proj.clamp(0, span);
    }

    let mut slide = IVec2::new(
        (origin.x as i64 + line.dir.x as i64 * proj / len_sq) as i32,
        (origin.y as i64 + line.dir.y as i64 * proj / len_sq) as i32,
    );

    if !ctx.is_player {
        let normal = IVec2::new(-line.dir.y, line.dir.x);
        let sign: i64 = if from_side < 0 { -1 } else { 1 };
        let amount = (line.wall_push as i64) << shift;
        slide.x += (sign * normal.x as i64 * amount / len) as i32;
        slide.y += (sign * normal.y as i64 * amount / len) as i32;
    }

    // (a) the slide must not end up past the wall,
    let side_now = cross2(line.dir, slide - origin);
    if side_now != 0 && (side_now < 0) != (from_side < 0) {
        return Slide::Rejected;
    }
    // (b) nor drift more than a couple of line-lengths off the segment.
    if side_now.abs() > SLIDE_DRIFT_LIMIT * (len_sq << shift) {
        return Slide::Rejected;
    }

    Slide::Accepted(slide)
}

/// After the scan settles, look for a committed zone transition: an exit
/// line the movement crossed, with the resolved position on its far side
/// and the target zone's height constraints satisfied.
///
/// Returns the target zone and the re-derived layer flag.
fn find_room(map: &ZoneMap, ctx: &MoveContext, zone: &Zone) -> Option<(morgrim_core::ZoneId, bool)> {
    for line_id in zone.exits.iter().copied() {
        let Some(line) = map.line(line_id) else {
            continue;
        };
        let Some(target_id) = line.connect else {
            continue;
        };
        if ctx.no_return == Some(target_id) {
            continue;
        }
        let Some(target) = map.zone(target_id) else {
            continue;
        };
        if crossing_test(line, ctx.old_pos, ctx.new_pos, ctx.scale_shift) == Crossing::Clear {
            continue;
        }
        if line.side(ctx.new_pos, ctx.scale_shift) >= 0 {
            // Crossed and came back; still in this zone.
            continue;
        }
        if !portal_passable(ctx, zone, target) {
            continue;
        }
        let upper = match target.layer_split() {
            Some(split) => ctx.y as i64 >= (split as i64) << ctx.scale_shift,
            None => false,
        };
        return Some((target_id, upper));
    }
    None
}

/// Resolve a movement request against zone geometry.
///
/// Returns the hit flag; the context's `new_pos`, `zone` and `in_upper`
/// carry the resolved state. Missing geometry makes the call a no-op with
/// the position restored and the hit flag cleared. Zone records are
/// re-read on every pass because doors and lifts may have moved heights
/// since the last tick.
pub fn resolve_move(map: &ZoneMap, ctx: &mut MoveContext) -> bool {
    ctx.hit = false;
    ctx.hit_entity = None;
    if ctx.delta() == IVec2::ZERO {
        return false;
    }

    let mut hops = 0;
    'zones: loop {
        let Some(zone) = map.zone(ctx.zone) else {
            ctx.new_pos = ctx.old_pos;
            ctx.hit = false;
            return false;
        };

        let mut passes = 0;
        'scan: loop {
            for line_id in zone.boundary() {
                let Some(line) = map.line(line_id) else {
                    continue;
                };
                let Crossing::Crossed { from_side } =
                    crossing_test(line, ctx.old_pos, ctx.new_pos, ctx.scale_shift)
                else {
                    continue;
                };

                // Passable portals are stepped over here; the transition is
                // committed by the room finder. A portal into the no-return
                // zone is a wall for this call.
                if let Some(target_id) = line.connect {
                    if ctx.no_return != Some(target_id) {
                        if let Some(target) = map.zone(target_id) {
                            if portal_passable(ctx, zone, target) {
                                continue;
                            }
                        }
                    }
                }

                match slide_along(line, ctx, from_side) {
                    Slide::Accepted(pos) => {
                        ctx.hit = true;
                        if pos == ctx.new_pos {
                            // Already settled against this line.
                            break 'scan;
                        }
                        ctx.new_pos = pos;
                        passes += 1;
                        if passes >= MAX_WALL_PASSES {
                            tracing::debug!(zone = ctx.zone.0, "wall scan cap hit, settling");
                            break 'scan;
                        }
                        // Restart so earlier lines see the new target
                        // (corners hit two walls in one tick).
                        continue 'scan;
                    }
                    Slide::Rejected => {
                        ctx.new_pos = ctx.old_pos;
                        ctx.hit = true;
                        return true;
                    }
                }
            }
            break 'scan;
        }

        match find_room(map, ctx, zone) {
            Some((target, upper)) => {
                ctx.zone = target;
                ctx.in_upper = upper;
                hops += 1;
                if hops >= MAX_ZONE_HOPS {
                    tracing::debug!(zone = ctx.zone.0, "zone transition cap hit, settling");
                    break 'zones;
                }
                // The new zone's own walls and portals still apply to the
                // remaining delta.
                continue 'zones;
            }
            None => break 'zones,
        }
    }

    ctx.hit
}
