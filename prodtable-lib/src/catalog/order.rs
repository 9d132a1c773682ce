//! Ordering vocabulary for catalog queries.

use crate::model::Direction;

/// A catalog-native sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Publication date.
    Date,
    /// Active price.
    Price,
    /// Item title.
    Title,
}

impl SortField {
    /// Maps a persisted sort field name to a native field.
    ///
    /// `name` is accepted as an alias of `title`. Returns `None` for fields
    /// the catalog cannot sort by.
    pub fn from_native(field: &str) -> Option<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "price" => Some(Self::Price),
            "title" | "name" => Some(Self::Title),
            _ => None,
        }
    }

    /// Returns the canonical field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Price => "price",
            Self::Title => "title",
        }
    }
}

/// Specifies the ordering of query results.
///
/// # Example
///
/// ```
/// use prodtable_lib::catalog::{OrderBy, SortField};
///
/// let order = OrderBy::desc(SortField::Price).then_asc(SortField::Title);
/// assert_eq!(order.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub(crate) fields: Vec<(SortField, Direction)>,
}

impl OrderBy {
    /// Orders by a field in the given direction.
    pub fn by(field: SortField, direction: Direction) -> Self {
        Self {
            fields: vec![(field, direction)],
        }
    }

    /// Creates an ascending order on a field.
    pub fn asc(field: SortField) -> Self {
        Self::by(field, Direction::Asc)
    }

    /// Creates a descending order on a field.
    pub fn desc(field: SortField) -> Self {
        Self::by(field, Direction::Desc)
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: SortField) -> Self {
        self.fields.push((field, Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: SortField) -> Self {
        self.fields.push((field, Direction::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(SortField, Direction)] {
        &self.fields
    }
}

impl std::fmt::Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, direction)| format!("{} {}", field.as_str(), direction.as_str()))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
