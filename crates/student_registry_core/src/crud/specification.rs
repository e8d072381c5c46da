//! Lookup predicates.

use crate::model::RecordId;
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt::{Display, Formatter};

/// One lookup predicate instance. Immutable once built; compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Specification {
    /// Primary key lookup.
    Id(RecordId),
    /// Unique username lookup.
    Username(String),
    /// Unique email lookup.
    Email(String),
}

impl Specification {
    pub fn id(value: RecordId) -> Self {
        Self::Id(value)
    }

    pub fn username(value: impl Into<String>) -> Self {
        Self::Username(value.into())
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self::Email(value.into())
    }

    /// Short name of the specification kind, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Username(_) => "username",
            Self::Email(_) => "email",
        }
    }

    /// Returns the id for `Id` specifications.
    pub fn as_id(&self) -> Option<RecordId> {
        match self {
            Self::Id(value) => Some(*value),
            Self::Username(_) | Self::Email(_) => None,
        }
    }
}

impl Display for Specification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(value) => write!(f, "id={value}"),
            Self::Username(value) => write!(f, "username={value}"),
            Self::Email(value) => write!(f, "email={value}"),
        }
    }
}

impl ToSql for Specification {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Id(value) => value.to_sql(),
            Self::Username(value) | Self::Email(value) => value.to_sql(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Specification;
    use std::collections::HashSet;

    #[test]
    fn specifications_compare_by_value() {
        assert_eq!(Specification::id(7), Specification::Id(7));
        assert_ne!(
            Specification::username("yuno123"),
            Specification::email("yuno123")
        );

        let set: HashSet<_> = [Specification::id(1), Specification::id(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn kind_and_id_accessors() {
        assert_eq!(Specification::id(3).as_id(), Some(3));
        assert_eq!(Specification::email("a@b.c").as_id(), None);
        assert_eq!(Specification::username("asta").kind(), "username");
    }
}
