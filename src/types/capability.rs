//! Small capability traits composed onto grid entities.

/// Entities with a stable identity handle.
pub trait Identifiable {
    type Id: Copy + Eq;

    fn id(&self) -> Self::Id;
}

/// Entities that can be torn down while other parts still hold handles to them.
///
/// Deferred work checks this before touching the entity again.
pub trait Disposable {
    fn is_disposed(&self) -> bool;
}
