use std::collections::HashMap;
use uuid::Uuid;

/// Run-scoped map from an instructor's full name to their id.
///
/// The transformer asks it for candidate ids, so every appearance of a name
/// within one run shares an id. Once the store has been consulted, the
/// upsert engine records the authoritative ids here with [`adopt`].
///
/// [`adopt`]: InstructorCache::adopt
#[derive(Debug, Clone, Default)]
pub struct InstructorCache {
    ids: HashMap<String, String>,
}

impl InstructorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins first and last name the way instructor names are stored
    pub fn full_name(first: &str, last: &str) -> String {
        format!("{first} {last}")
    }

    /// Returns the id for `name`, minting a fresh opaque one on first sight
    pub fn candidate_id(&mut self, name: &str) -> String {
        self.ids
            .entry(name.to_owned())
            .or_insert_with(|| Uuid::new_v4().simple().to_string())
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    /// Replaces candidate ids with the ones on record
    pub fn adopt(&mut self, stored: impl IntoIterator<Item = (String, String)>) {
        self.ids.extend(stored);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
