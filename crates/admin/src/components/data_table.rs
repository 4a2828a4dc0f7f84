//! Data table component types.
//!
//! These types define the column layout for the panel tables; templates
//! iterate over them to render headers so the panels stay consistent.

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Build a column list from `(key, label)` pairs.
#[must_use]
pub fn columns(pairs: &[(&str, &str)]) -> Vec<TableColumn> {
    pairs
        .iter()
        .map(|(key, label)| TableColumn::new(key, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_builder() {
        let cols = columns(&[("name", "Name"), ("status", "Status")]);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].key, "name");
        assert_eq!(cols[1].label, "Status");
    }
}
