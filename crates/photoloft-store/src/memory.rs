//! In-memory persistence, for tests and ephemeral setups.

use std::sync::Mutex;

use photoloft_core::ports::ObjectPersistence;

/// Holds the item in a mutex-guarded slot; nothing survives the process.
#[derive(Default)]
pub struct MemoryPersistence<T> {
    slot: Mutex<Option<T>>,
}

impl<T> MemoryPersistence<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn with_item(item: T) -> Self {
        Self {
            slot: Mutex::new(Some(item)),
        }
    }
}

impl<T: Clone + Send + Sync> ObjectPersistence<T> for MemoryPersistence<T> {
    fn has_item(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn load_item(&self) -> anyhow::Result<Option<T>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save_item(&self, item: &T) -> anyhow::Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(item.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let store: MemoryPersistence<String> = MemoryPersistence::new();
        assert!(!store.has_item());
        assert_eq!(store.load_item().unwrap(), None);

        store.save_item(&"hello".to_string()).unwrap();
        assert!(store.has_item());
        assert_eq!(store.load_item().unwrap(), Some("hello".to_string()));

        store.clear().unwrap();
        assert!(!store.has_item());
    }
}
