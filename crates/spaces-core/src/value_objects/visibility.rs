//! Soft-delete visibility
//!
//! Every read path that touches a table with a `deleted` flag takes a
//! [`Visibility`] and filters through [`Visibility::admits`] (in-process
//! stores) or the SQL `LiveFilter` built from it (PostgreSQL store). Keeping
//! one switch for the whole read makes it impossible to filter one side of a
//! join and forget the other without saying so explicitly.

/// Whether a read may surface soft-deleted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Default: tombstoned rows are invisible
    #[default]
    Live,
    /// Moderation/audit reads that must see tombstoned rows too
    IncludeDeleted,
}

/// Rows that carry a soft-delete flag
pub trait SoftDeletable {
    fn is_deleted(&self) -> bool;
}

impl Visibility {
    /// Check whether a row passes this visibility filter
    #[inline]
    pub fn admits<T: SoftDeletable + ?Sized>(self, row: &T) -> bool {
        self.includes_deleted() || !row.is_deleted()
    }

    #[inline]
    pub fn includes_deleted(self) -> bool {
        matches!(self, Self::IncludeDeleted)
    }
}
