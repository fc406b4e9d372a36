//! Morgrim Physics - zone-based movement and collision resolution.
//!
//! Moves any mobile entity through a network of convex zones connected by
//! portals: wall slides, step-tolerant zone transitions, split-level
//! rooms, object collision, steering and teleports.
//!
//! # Architecture
//!
//! - **Movement**: the per-call resolver (crossing test, portal
//!   passability, wall slide, room finder) plus steering helpers and the
//!   sub-stepper
//! - **Collision**: the object-vs-object checker
//!
//! # Design Principles
//!
//! 1. **Determinism**: fixed-point integers end to end; same inputs, same
//!    resolved position on every platform
//! 2. **Run to completion**: no suspension points; bounded iteration caps
//!    are the only non-termination guard
//! 3. **Trusted content**: geometry is validated at load time, so runtime
//!    lookups degrade to no-ops instead of faulting

pub mod collision;
pub mod config;
pub mod movement;

pub use collision::check_object_collision;
pub use movement::{
    head_towards, head_towards_angle, resolve_move, step_move, teleport, MoveContext,
};
