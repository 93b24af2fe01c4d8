use std::collections::HashSet;

/// Immutable, in-memory copy of the dictionary held for one batch.
#[derive(Debug, Clone, Default)]
pub struct DictionarySnapshot {
    /// Names in store load order (drives first-match scanning)
    names: Vec<String>,
    index: HashSet<String>,
}

impl DictionarySnapshot {
    /// Build a snapshot, keeping the first occurrence of any repeated name.
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashSet::with_capacity(names.len());
        let names = names
            .into_iter()
            .filter(|name| index.insert(name.clone()))
            .collect();
        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn exact_lookup(&self, normalized_word: &str) -> Option<&str> {
        self.index.get(normalized_word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keeps_load_order_and_dedups() {
        let snap = DictionarySnapshot::new(vec![
            "losartan".to_string(),
            "metformin".to_string(),
            "losartan".to_string(),
        ]);
        assert_eq!(snap.names(), ["losartan", "metformin"]);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.exact_lookup("metformin"), Some("metformin"));
        assert_eq!(snap.exact_lookup("Metformin"), None);
    }
}
