//! Zone/portal level geometry - the geometry store the resolver reads.
//!
//! A level is a set of convex zones bounded by directed floor lines. Each
//! line is either a solid wall or a portal into an adjacent zone. Zone line
//! lists are wound so the interior lies on the positive side (left of the
//! line direction) of every line; every portal appears in both adjacent
//! zones as oppositely-directed copies.
//!
//! Zones and lines are addressed by small integer handles rather than
//! references, and all lookups are checked: a dangling handle turns the
//! enclosing operation into a no-op instead of a panic. Content is expected
//! to pass [`ZoneMap::validate`] at load time.
//!
//! Height fields may be mutated between ticks (doors, lifts) through
//! [`ZoneMap::zone_mut`]; the resolver re-reads them on every call.

pub mod test_level;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{cross2, isqrt, scale_up};

/// Stable handle to a zone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    bincode::Encode, bincode::Decode,
)]
pub struct ZoneId(pub u16);

/// Stable handle to a floor line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    bincode::Encode, bincode::Decode,
)]
pub struct LineId(pub u16);

/// Default push-away strength for new lines, base map units.
const DEFAULT_WALL_PUSH: i32 = 2;

/// A directed boundary segment in the XZ plane.
///
/// `IVec2::y` holds the world Z coordinate. The segment runs from `origin`
/// to `origin + dir`; `length` is precomputed at construction and must be
/// kept in sync with `dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorLine {
    pub origin: IVec2,
    /// Unnormalized direction; spans the whole segment.
    pub dir: IVec2,
    /// Adjacent zone for portals, `None` for solid walls.
    pub connect: Option<ZoneId>,
    /// Precomputed |dir| in base map units.
    pub length: i32,
    /// Push-away strength applied to sliding non-player movers.
    pub wall_push: i32,
}

impl FloorLine {
    fn with_connect(from: IVec2, to: IVec2, connect: Option<ZoneId>) -> Self {
        let dir = to - from;
        let length = isqrt((dir.x as i64 * dir.x as i64 + dir.y as i64 * dir.y as i64) as u64) as i32;
        Self {
            origin: from,
            dir,
            connect,
            length,
            wall_push: DEFAULT_WALL_PUSH,
        }
    }

    /// A solid wall segment.
    pub fn wall(from: IVec2, to: IVec2) -> Self {
        Self::with_connect(from, to, None)
    }

    /// A portal segment into `target`.
    pub fn portal(from: IVec2, to: IVec2, target: ZoneId) -> Self {
        Self::with_connect(from, to, Some(target))
    }

    /// Override the push-away strength.
    pub fn with_push(mut self, push: i32) -> Self {
        self.wall_push = push;
        self
    }

    /// Signed side of a fine-unit point: positive on the zone interior side,
    /// negative beyond the line, zero exactly on it.
    #[inline]
    pub fn side(&self, point: IVec2, shift: u8) -> i64 {
        cross2(self.dir, point - scale_up(self.origin, shift))
    }
}

/// A floor/roof pair bounding one playable band of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerBand {
    pub floor: i32,
    pub roof: i32,
}

/// Destination of a teleporter zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportTarget {
    pub zone: ZoneId,
    /// Arrival point in base map units.
    pub dest: IVec2,
}

/// A convex room with its own heights and boundary lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub floor: i32,
    pub roof: i32,
    /// Secondary playable band for split-level rooms.
    pub upper: Option<LayerBand>,
    /// Portal-eligible boundary lines.
    pub exits: Vec<LineId>,
    /// Solid-only boundary lines.
    pub walls: Vec<LineId>,
    pub teleport: Option<TeleportTarget>,
}

impl Zone {
    pub fn new(floor: i32, roof: i32) -> Self {
        Self {
            floor,
            roof,
            upper: None,
            exits: Vec::new(),
            walls: Vec::new(),
            teleport: None,
        }
    }

    /// Add an upper playable band.
    pub fn with_upper(mut self, floor: i32, roof: i32) -> Self {
        self.upper = Some(LayerBand { floor, roof });
        self
    }

    /// The floor/roof band occupied by a mover on the given layer. Asking
    /// for the upper band of a single-band zone yields the main band.
    pub fn band(&self, upper: bool) -> LayerBand {
        match (upper, self.upper) {
            (true, Some(band)) => band,
            _ => LayerBand {
                floor: self.floor,
                roof: self.roof,
            },
        }
    }

    /// Vertical split between layers; positions at or above it count as the
    /// upper band. `None` for single-band zones.
    pub fn layer_split(&self) -> Option<i32> {
        self.upper.map(|band| band.floor)
    }

    /// All boundary lines in scan order: exits first, then walls.
    pub fn boundary(&self) -> impl Iterator<Item = LineId> + '_ {
        self.exits.iter().copied().chain(self.walls.iter().copied())
    }
}

/// Load-time validation failures. A malformed level is a content bug; none
/// of these are reachable through the runtime API once validation passed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("zone {zone} references missing line {line}")]
    DanglingLine { zone: u16, line: u16 },
    #[error("line {line} connects to missing zone {zone}")]
    DanglingConnect { line: u16, zone: u16 },
    #[error("line {line} has zero length")]
    DegenerateLine { line: u16 },
    #[error("zone {zone} roof {roof} is below floor {floor}")]
    InvertedBand { zone: u16, floor: i32, roof: i32 },
    #[error("zone {zone} teleport targets missing zone {target}")]
    DanglingTeleport { zone: u16, target: u16 },
}

/// The geometry store: zones and floor lines addressed by stable indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneMap {
    zones: Vec<Zone>,
    lines: Vec<FloorLine>,
}

impl ZoneMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = ZoneId(self.zones.len() as u16);
        self.zones.push(zone);
        id
    }

    pub fn add_line(&mut self, line: FloorLine) -> LineId {
        let id = LineId(self.lines.len() as u16);
        self.lines.push(line);
        id
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.0 as usize)
    }

    /// Mutable zone access for doors and lifts adjusting heights between
    /// ticks.
    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(id.0 as usize)
    }

    pub fn line(&self, id: LineId) -> Option<&FloorLine> {
        self.lines.get(id.0 as usize)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether a fine-unit point lies inside the zone (on-boundary counts
    /// as inside).
    pub fn contains(&self, id: ZoneId, point: IVec2, shift: u8) -> bool {
        let Some(zone) = self.zone(id) else {
            return false;
        };
        zone.boundary().all(|line_id| {
            self.line(line_id)
                .map_or(true, |line| line.side(point, shift) >= 0)
        })
    }

    /// Check every handle and height band in the map.
    pub fn validate(&self) -> Result<(), MapError> {
        for (idx, line) in self.lines.iter().enumerate() {
            if line.dir == IVec2::ZERO {
                return Err(MapError::DegenerateLine { line: idx as u16 });
            }
            if let Some(target) = line.connect {
                if self.zone(target).is_none() {
                    return Err(MapError::DanglingConnect {
                        line: idx as u16,
                        zone: target.0,
                    });
                }
            }
        }
        for (idx, zone) in self.zones.iter().enumerate() {
            for line_id in zone.boundary() {
                if self.line(line_id).is_none() {
                    return Err(MapError::DanglingLine {
                        zone: idx as u16,
                        line: line_id.0,
                    });
                }
            }
            for band in [zone.band(false), zone.band(true)] {
                if band.roof < band.floor {
                    return Err(MapError::InvertedBand {
                        zone: idx as u16,
                        floor: band.floor,
                        roof: band.roof,
                    });
                }
            }
            if let Some(pad) = zone.teleport {
                if self.zone(pad.zone).is_none() {
                    return Err(MapError::DanglingTeleport {
                        zone: idx as u16,
                        target: pad.zone.0,
                    });
                }
            }
        }
        Ok(())
    }
}
