use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Service labels offered at a location.
///
/// Keeps the order in which labels were entered and never holds the same
/// label twice. Labels compare by exact string value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Services(#[schemars(with = "Vec<String>")] IndexSet<String>);

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `label` unless it is already present. Returns whether the
    /// label was added.
    pub fn insert<S: Into<String>>(&mut self, label: S) -> bool {
        self.0.insert(label.into())
    }

    /// Removes `label`, keeping the order of the remaining labels.
    pub fn remove(&mut self, label: &str) -> bool {
        self.0.shift_remove(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Column representation: an empty set is stored as `NULL`.
    pub fn to_column(&self) -> Option<Vec<String>> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_vec())
        }
    }

    pub fn from_column(column: Option<Vec<String>>) -> Self {
        column.unwrap_or_default().into_iter().collect()
    }
}

// Order matters for equality, unlike `IndexSet`'s own impl.
impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Services {}

impl<S: Into<String>> FromIterator<S> for Services {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Services {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut services = Services::new();
        assert!(services.insert("Electronics"));
        assert!(!services.insert("Electronics"));
        assert_eq!(services.to_vec(), vec!["Electronics"]);
    }

    #[test]
    fn labels_are_case_sensitive() {
        let mut services = Services::new();
        services.insert("bikes");
        assert!(services.insert("Bikes"));
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn remove_keeps_order() {
        let mut services: Services = ["a", "b", "c"].into_iter().collect();
        assert!(services.remove("b"));
        assert!(!services.remove("z"));
        assert_eq!(services.to_vec(), vec!["a", "c"]);
    }

    #[test]
    fn equality_respects_order() {
        let ab: Services = ["a", "b"].into_iter().collect();
        let ba: Services = ["b", "a"].into_iter().collect();
        assert_ne!(ab, ba);
    }

    #[test]
    fn empty_set_is_a_null_column() {
        assert_eq!(Services::new().to_column(), None);
        assert_eq!(Services::from_column(None), Services::new());
        let services = Services::from_column(Some(vec!["x".into(), "x".into()]));
        assert_eq!(services.to_column(), Some(vec!["x".to_owned()]));
    }
}
