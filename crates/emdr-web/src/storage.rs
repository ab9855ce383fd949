use emdr_core::{KeyValueStore, StoreError};
use web_sys as web;

/// `window.localStorage` as a settings backend.
pub struct LocalStore {
    storage: web::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StoreError> {
        let window = web::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected(format!("{:?}", e)))
    }
}
