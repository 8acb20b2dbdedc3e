//! The `Kinded` trait linking runtime values to the kind graph.

use std::fmt::Debug;

/// Trait for values that carry a kind from a [`KindGraph`](super::KindGraph).
///
/// States and events implement this to report the *name* of their concrete
/// kind. The machine resolves the name against its graph once per operation,
/// so implementations should return the registered name verbatim.
///
/// # Example
///
/// ```rust
/// use kindred::Kinded;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Door {
///     Closed { locked: bool },
///     Open { locked: bool },
/// }
///
/// impl Kinded for Door {
///     fn kind(&self) -> &str {
///         match self {
///             Self::Closed { .. } => "Closed",
///             Self::Open { .. } => "Open",
///         }
///     }
/// }
///
/// assert_eq!(Door::Closed { locked: true }.kind(), "Closed");
/// ```
pub trait Kinded: Debug {
    /// Name of this value's concrete kind, as registered in the graph.
    fn kind(&self) -> &str;
}
