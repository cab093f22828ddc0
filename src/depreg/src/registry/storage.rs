use std::collections::HashMap;
use std::mem;

use crate::registry::Stored;

#[derive(Default)]
pub struct StorageMap {
    entries: HashMap<&'static str, Box<dyn Stored>>,
}

impl StorageMap {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Box<dyn Stored>> {
        self.entries.get(name).map(|entry| (**entry).dyn_clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn insert(&mut self, name: &'static str, value: Box<dyn Stored>) -> Option<Box<dyn Stored>> {
        self.entries.insert(name, value)
    }

    pub fn fill(
        &mut self,
        name: &'static str,
        value: Box<dyn Stored>,
    ) -> (Box<dyn Stored>, Option<Box<dyn Stored>>) {
        match self.entries.get(name) {
            Some(existing) if (**existing).stored_type() == (*value).stored_type() => {
                ((**existing).dyn_clone(), Some(value))
            }
            _ => {
                let winner = (*value).dyn_clone();
                let displaced = self.entries.insert(name, value);
                (winner, displaced)
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Stored>> {
        self.entries.remove(name)
    }

    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::util::any::{Downcast, DowncastRef};

    use super::*;

    #[test]
    fn storage_map_insert_replaces_previous_value() {
        let mut map = StorageMap::new();
        assert!(map.insert("answer", Box::new(1i32)).is_none());

        let previous = map.insert("answer", Box::new(2i32)).unwrap();
        assert_eq!(previous.downcast_ref::<i32>(), Some(&1));
        assert_eq!(map.get("answer").unwrap().downcast_ref::<i32>(), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn storage_map_get_clones_shared_values() {
        let shared = Arc::new(String::from("shared"));
        let mut map = StorageMap::new();
        map.insert("shared", Box::new(Arc::clone(&shared)));

        let first = map.get("shared").unwrap().downcast::<Arc<String>>().ok().unwrap();
        let second = map.get("shared").unwrap().downcast::<Arc<String>>().ok().unwrap();
        assert!(Arc::ptr_eq(&first, &shared));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn storage_map_fill_keeps_existing_value_of_same_type() {
        let mut map = StorageMap::new();
        map.insert("slot", Box::new(1u8));

        let (winner, loser) = map.fill("slot", Box::new(2u8));
        assert_eq!(winner.downcast_ref::<u8>(), Some(&1));
        assert_eq!(loser.unwrap().downcast_ref::<u8>(), Some(&2));
        assert_eq!(map.get("slot").unwrap().downcast_ref::<u8>(), Some(&1));
    }

    #[test]
    fn storage_map_fill_overwrites_value_of_other_type() {
        let mut map = StorageMap::new();
        map.insert("slot", Box::new("text"));

        let (winner, displaced) = map.fill("slot", Box::new(2u8));
        assert_eq!(winner.downcast_ref::<u8>(), Some(&2));
        assert_eq!(displaced.unwrap().downcast_ref::<&str>(), Some(&"text"));

        let (winner, displaced) = map.fill("empty", Box::new(3u8));
        assert_eq!(winner.downcast_ref::<u8>(), Some(&3));
        assert!(displaced.is_none());
    }

    #[test]
    fn storage_map_take_clears_everything() {
        let mut map = StorageMap::new();
        map.insert("a", Box::new(1i32));
        map.insert("b", Box::new(2i64));

        let taken = map.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(map.len(), 0);
        assert!(!map.contains("a"));
        assert!(map.remove("b").is_none());
    }
}
