//! Soft-delete filter shared by every query touching a `deleted` column

use spaces_core::value_objects::Visibility;

/// Renders the `deleted = FALSE` predicates for a query
///
/// Every table alias with a `deleted` column that a read joins must be
/// listed, so a single call covers the whole join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveFilter {
    visibility: Visibility,
}

impl LiveFilter {
    pub fn new(visibility: Visibility) -> Self {
        Self { visibility }
    }

    /// `AND`-prefixed predicates for `aliases`, or nothing when deleted rows are wanted
    pub fn and_live(self, aliases: &[&str]) -> String {
        if self.visibility.includes_deleted() {
            return String::new();
        }

        aliases
            .iter()
            .map(|alias| format!(" AND {alias}.deleted = FALSE"))
            .collect()
    }
}
