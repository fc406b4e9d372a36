//! Hand-built fixture maps for tests.
//!
//! Rectangles are wound counter-clockwise so the interior lands on the
//! positive side of every line, matching the winding convention the
//! resolver relies on.

use glam::IVec2;

use super::{FloorLine, TeleportTarget, Zone, ZoneId, ZoneMap};

/// Corner points of an axis-aligned rectangle in CCW order:
/// south-west, south-east, north-east, north-west.
fn corners(min: IVec2, max: IVec2) -> [IVec2; 4] {
    [
        min,
        IVec2::new(max.x, min.y),
        max,
        IVec2::new(min.x, max.y),
    ]
}

/// Wall off a rectangular zone, skipping edge indices listed in `open`
/// (0 = south, 1 = east, 2 = north, 3 = west) so portals can go there.
fn add_rect_walls(map: &mut ZoneMap, zone: ZoneId, min: IVec2, max: IVec2, open: &[usize]) {
    let c = corners(min, max);
    for edge in 0..4 {
        if open.contains(&edge) {
            continue;
        }
        let line = map.add_line(FloorLine::wall(c[edge], c[(edge + 1) % 4]));
        if let Some(z) = map.zone_mut(zone) {
            z.walls.push(line);
        }
    }
}

/// A single 1000x1000 zone with solid walls and nothing else.
pub fn open_arena() -> (ZoneMap, ZoneId) {
    let mut map = ZoneMap::new();
    let zone = map.add_zone(Zone::new(0, 256));
    add_rect_walls(&mut map, zone, IVec2::ZERO, IVec2::new(1000, 1000), &[]);
    (map, zone)
}

/// Two 1000x1000 rooms sharing a portal at x = 1000. The second room's
/// floor sits `step` units above the first's; clearance is equal in both.
pub fn two_rooms(step: i32) -> (ZoneMap, ZoneId, ZoneId) {
    let mut map = ZoneMap::new();
    let a = map.add_zone(Zone::new(0, 256));
    let b = map.add_zone(Zone::new(step, step + 256));

    add_rect_walls(&mut map, a, IVec2::ZERO, IVec2::new(1000, 1000), &[1]);
    let a_exit = map.add_line(FloorLine::portal(
        IVec2::new(1000, 0),
        IVec2::new(1000, 1000),
        b,
    ));
    map.zone_mut(a).unwrap().exits.push(a_exit);

    add_rect_walls(&mut map, b, IVec2::new(1000, 0), IVec2::new(2000, 1000), &[3]);
    let b_exit = map.add_line(FloorLine::portal(
        IVec2::new(1000, 1000),
        IVec2::new(1000, 0),
        a,
    ));
    map.zone_mut(b).unwrap().exits.push(b_exit);

    (map, a, b)
}

/// Like [`two_rooms`], but both rooms are split-level: a lower band at
/// 0..128 and an upper band whose floor in the second room sits
/// `upper_step` above the first room's.
pub fn two_level_rooms(upper_step: i32) -> (ZoneMap, ZoneId, ZoneId) {
    let (mut map, a, b) = two_rooms(0);
    map.zone_mut(a).unwrap().upper = Some(super::LayerBand {
        floor: 160,
        roof: 288,
    });
    map.zone_mut(b).unwrap().upper = Some(super::LayerBand {
        floor: 160 + upper_step,
        roof: 288 + upper_step,
    });
    (map, a, b)
}

/// Two disconnected arenas; the first carries a teleporter pad into the
/// second, which has a raised floor.
pub fn teleport_arenas() -> (ZoneMap, ZoneId, ZoneId) {
    let mut map = ZoneMap::new();
    let a = map.add_zone(Zone::new(0, 256));
    let b = map.add_zone(Zone::new(64, 320));
    add_rect_walls(&mut map, a, IVec2::ZERO, IVec2::new(1000, 1000), &[]);
    add_rect_walls(&mut map, b, IVec2::new(2000, 0), IVec2::new(3000, 1000), &[]);
    map.zone_mut(a).unwrap().teleport = Some(TeleportTarget {
        zone: b,
        dest: IVec2::new(2500, 500),
    });
    (map, a, b)
}
