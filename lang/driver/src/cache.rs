use watling_lang_ast::HashMap;

/// Values computed per file, keyed by the file's path
pub struct Cache<T> {
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self { entries: HashMap::default() }
    }
}

impl<T> Cache<T> {
    /// Get the value associated with a path regardless of staleness
    pub fn get_even_if_stale(&self, path: &str) -> Option<&T> {
        self.entries.get(path).map(|entry| entry.value())
    }

    /// Get the value associated with a path if it is not stale
    pub fn get_unless_stale(&self, path: &str) -> Option<&T> {
        if self.is_stale(path) { None } else { self.get_even_if_stale(path) }
    }

    pub fn insert(&mut self, path: String, value: T) {
        self.entries.insert(path, CacheEntry::from(value));
    }

    pub fn is_stale(&self, path: &str) -> bool {
        self.entries.get(path).map(|entry| entry.stale).unwrap_or(true)
    }

    pub fn invalidate(&mut self, path: &str) {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.stale = true;
        }
    }
}

pub struct CacheEntry<T> {
    value: T,
    stale: bool,
}

impl<T> CacheEntry<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> From<T> for CacheEntry<T> {
    fn from(value: T) -> Self {
        Self { value, stale: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidated_entries_are_stale() {
        let mut cache = Cache::default();
        assert!(cache.is_stale("a.php"));
        cache.insert("a.php".to_owned(), 1);
        assert_eq!(cache.get_unless_stale("a.php"), Some(&1));
        cache.invalidate("a.php");
        assert_eq!(cache.get_unless_stale("a.php"), None);
        assert_eq!(cache.get_even_if_stale("a.php"), Some(&1));
    }
}
