//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Find an entity by id in a flat collection.
pub fn find<'a, E: Entity>(records: &'a [E], id: &E::Id) -> Option<&'a E> {
    records.iter().find(|r| r.id() == id)
}

/// Mutable variant of [`find`].
pub fn find_mut<'a, E: Entity>(records: &'a mut [E], id: &E::Id) -> Option<&'a mut E> {
    records.iter_mut().find(|r| r.id() == id)
}

/// Returns the id of the first record that shares its id with an earlier one.
pub fn first_duplicate_id<E: Entity>(records: &[E]) -> Option<&E::Id> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    records.iter().map(Entity::id).find(|id| !seen.insert(*id))
}
