//! Kind lattice: runtime type identity for states and events.
//!
//! Every state and event value carries a *kind*: a tag in an explicit
//! subtype graph declared up front. Kinds form a lattice with single class
//! inheritance plus interface-like capabilities, and the resolver answers
//! two questions about a concrete value:
//!
//! - does it match a declared reference kind at all (subtype check), and
//! - how many specialization steps separate the two (distance, used to
//!   rank overlapping rules).
//!
//! There is no reflection anywhere: the graph is plain data built once,
//! and dispatch works on small integer tags.

mod graph;
mod value;

pub use graph::{GraphError, Kind, KindGraph};
pub use value::Kinded;
