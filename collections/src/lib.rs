//! Ranges of ordered values generated by a step function.
//!
//! A range is described by an inclusive lower bound, an inclusive upper bound and a step function
//! producing the element following a given one. Two containers implement the [`SteppedSet`] interface:
//!
//!  - [`RangeSet`] only stores its bounds and its step: size, membership and iteration are derived on
//!    demand and the range cannot be modified. Membership is decided by comparing against the bounds.
//!  - [`MutableRange`] enumerates all elements up front into an ordered set, which can then be modified
//!    freely. Membership is decided by exact lookup.
//!
//! Signed integers and floating point numbers have a default step (`+1` and `+0.1` respectively, see
//! [`ElementKind::default_step`]); any other element type needs an explicit step function.
//!
//! ```
//! use stepset::{MutableRange, RangeSet, SteppedSet};
//!
//! let lazy = RangeSet::of(0.0, 1.0).unwrap();
//! let eager = MutableRange::from(&lazy);
//! assert_eq!(lazy.len(), eager.len());
//! assert_eq!(lazy.contains(&0.25), Ok(true));
//! assert_eq!(eager.contains(&0.25), Ok(false));
//! ```
//!
//! A range whose two bounds are equal is empty.

mod error;
mod kind;
mod materialized;
pub mod params;
mod range;
mod set;
mod step;

pub use error::RangeError;
pub use kind::{ElementKind, Numeric, StepDelta};
pub use materialized::{MaterializedIter, MutableRange};
pub use range::{Iter, RangeBuilder, RangeSet};
pub use set::SteppedSet;
pub use step::{CanonicalStep, Stepper};
