/// The set of active filter keys, kept in activation order.
///
/// A key is active iff it is present. Deactivation removes the key, so there
/// is no "present but false" state to reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns false when the key was already active.
    pub fn add(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key.to_string());
        true
    }

    /// Returns false when the key was not active.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    /// `set(key, true)` activates, `set(key, false)` deletes. Reports whether
    /// the selection changed.
    pub fn set(&mut self, key: &str, active: bool) -> bool {
        if active { self.add(key) } else { self.remove(key) }
    }

    pub fn toggle(&mut self, key: &str) {
        if !self.remove(key) {
            self.add(key);
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.keys.is_empty();
        self.keys.clear();
        changed
    }

    /// The key at `index` in activation order.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for key in iter {
            selection.add(key.as_ref());
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.add("active"));
        assert!(!selection.add("active"));
        assert_eq!(selection.iter().count(), 1);
    }

    #[test]
    fn test_set_false_deletes() {
        let mut selection = Selection::new();
        selection.set("LinkedIn", true);
        assert!(selection.contains("LinkedIn"));
        assert!(selection.set("LinkedIn", false));
        assert!(!selection.contains("LinkedIn"));
        assert!(selection.is_empty());
        assert!(!selection.set("LinkedIn", false));
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        selection.toggle("PhD");
        assert!(selection.contains("PhD"));
        selection.toggle("PhD");
        assert!(!selection.contains("PhD"));
    }

    #[test]
    fn test_iter_keeps_activation_order() {
        let mut selection: Selection = ["job-456", "active", "job-123"].into_iter().collect();
        selection.remove("active");
        selection.add("archived");
        let keys: Vec<_> = selection.iter().collect();
        assert_eq!(keys, vec!["job-456", "job-123", "archived"]);
    }

    #[test]
    fn test_get_by_position() {
        let selection: Selection = ["active", "PhD"].into_iter().collect();
        assert_eq!(selection.get(1), Some("PhD"));
        assert_eq!(selection.get(2), None);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut selection: Selection = ["a", "b"].into_iter().collect();
        assert!(selection.clear());
        assert!(!selection.clear());
    }
}
