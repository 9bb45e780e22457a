//! Entity trait: rows identified by their primary key.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Primary key type of the backing table.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
