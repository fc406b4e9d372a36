//! Object collision checking.
//!
//! Independent of the wall resolver: geometry says where a mover may
//! stand, this module says whether another body is already there.

mod objects;

pub use objects::check_object_collision;
