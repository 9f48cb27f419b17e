//! Exact designation lookups

use std::collections::HashMap;

/// Row lookup by designation. Repeated designations resolve to their first row.
#[derive(Debug, Default)]
pub struct DesignationIndex {
    rows: HashMap<String, usize>,
}

impl DesignationIndex {
    pub fn new<'a, I>(designations: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rows = HashMap::new();
        for (row, designation) in designations.into_iter().enumerate() {
            rows.entry(designation.trim().to_string()).or_insert(row);
        }
        Self { rows }
    }

    pub fn get(&self, designation: &str) -> Option<usize> {
        self.rows.get(designation.trim()).copied()
    }

    pub fn contains(&self, designation: &str) -> bool {
        self.rows.contains_key(designation.trim())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let index = DesignationIndex::new(["2MASS J1", "2MASS J2", "2MASS J1"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("2MASS J1"), Some(0));
        assert_eq!(index.get(" 2MASS J2 "), Some(1));
        assert!(!index.contains("2MASS J3"));
    }
}
