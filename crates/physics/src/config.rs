//! Resolver tuning constants.
//!
//! All iteration caps and numeric tolerances are gathered here. The caps
//! are the only guard against non-termination on degenerate geometry, so
//! each one is documented with what exhausting it means.

/// Maximum wall-scan restarts per zone per call. An accepted slide restarts
/// the scan so corner pairs are caught; exhausting this settles the mover
/// at its last slide position.
pub const MAX_WALL_PASSES: u32 = 8;

/// Maximum committed zone transitions per call. Legitimate geometry can
/// chain several transitions in one tick; exhausting this settles the mover
/// in whatever zone it reached.
pub const MAX_ZONE_HOPS: u32 = 8;

/// Maximum sub-step increments per tick. Displacement beyond
/// `MAX_SUB_STEPS * SUB_STEP_LEN` is dropped for the tick.
pub const MAX_SUB_STEPS: u32 = 16;

/// Sub-step increment length, base map units.
pub const SUB_STEP_LEN: i32 = 64;

/// End slack when confirming a crossing lies on the finite segment, base
/// map units along the line.
pub const CROSS_END_SLACK: i32 = 1;

/// Walls shorter than this (stair risers, door jambs) reject out-of-range
/// slides instead of clamping to an endpoint.
pub const SHORT_WALL_LEN: i32 = 128;

/// Accepted slides may drift at most this many line-lengths from the
/// segment before they are rejected.
pub const SLIDE_DRIFT_LIMIT: i64 = 2;

/// Default step-up tolerance, base map units.
pub const DEFAULT_STEP_UP: i32 = 32;

/// Step-down tolerance meaning "any drop is fine" (players, projectiles).
pub const UNLIMITED_DROP: i32 = i32::MAX / 2;
