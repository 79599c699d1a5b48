//! Receiving address selection.
//!
//! Each network has a static pool of candidate receiving addresses. A
//! provider picks one candidate per request; the rotation controller
//! owns the currently displayed selection and discards results that
//! were superseded by a newer network choice.

mod pool;
mod rotation;

pub use pool::{AddressPool, AddressProvider, PoolProvider};
pub use rotation::{AddressState, RotationController, SelectedAddress};
