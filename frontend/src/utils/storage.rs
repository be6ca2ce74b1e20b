use std::{cell::RefCell, collections::HashMap, rc::Rc};
use web_sys::{Storage, Window};

pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "No window object".to_string())
}

pub fn local_storage() -> Result<Storage, String> {
    window()?
        .local_storage()
        .map_err(|_| "No localStorage".to_string())?
        .ok_or_else(|| "No localStorage".to_string())
}

/// Synchronous string key-value store the session is persisted in.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// `window.localStorage`, looked up on every call so a blocked storage
/// (private mode, sandboxed iframe) surfaces as an error instead of a panic.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        local_storage()?
            .get_item(key)
            .map_err(|_| format!("Failed to read {}", key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        local_storage()?
            .set_item(key, value)
            .map_err(|_| format!("Failed to store {}", key))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        local_storage()?
            .remove_item(key)
            .map_err(|_| format!("Failed to remove {}", key))
    }
}

/// In-memory storage; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(BrowserStorage)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(MemoryStorage::new())
}
