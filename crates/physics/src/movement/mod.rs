//! Movement resolution.
//!
//! Consumers fill a [`MoveContext`] with the old and requested positions
//! plus the mover's constraints, then call [`resolve_move`] (or
//! [`step_move`] for high-velocity movers). The steering helpers and
//! [`teleport`] are thin layers on the same machinery.
//!
//! Everything here is deterministic fixed-point integer math: the same
//! context and geometry always resolve to the same position.

mod context;
mod resolver;
mod steering;
mod stepper;
mod teleport;

pub use context::MoveContext;
pub use resolver::resolve_move;
pub use steering::{head_towards, head_towards_angle};
pub use stepper::step_move;
pub use teleport::teleport;
