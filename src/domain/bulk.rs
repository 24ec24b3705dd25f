//! Selection passed to bulk endpoints.

use serde::Serialize;

/// Which records of a hub a bulk operation touches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BulkSelection<T> {
    /// Exactly the listed records.
    Ids(Vec<T>),
    /// Every record of the hub except the listed ones.
    AllExcept(Vec<T>),
}

impl<T> BulkSelection<T> {
    /// Ids carried by the selection, regardless of its kind.
    pub fn ids(&self) -> &[T] {
        match self {
            BulkSelection::Ids(ids) | BulkSelection::AllExcept(ids) => ids,
        }
    }

    pub fn map<U, F>(self, f: F) -> BulkSelection<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            BulkSelection::Ids(ids) => BulkSelection::Ids(ids.into_iter().map(f).collect()),
            BulkSelection::AllExcept(ids) => {
                BulkSelection::AllExcept(ids.into_iter().map(f).collect())
            }
        }
    }
}
