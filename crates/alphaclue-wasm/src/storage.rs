use alphaclue_core::{Error, MemoryStorage, Result, Storage};

/// `window.localStorage`, or an in-memory map when the page has none
pub struct BrowserStorage {
    local: Option<web_sys::Storage>,
    fallback: MemoryStorage,
}

impl BrowserStorage {
    pub fn local() -> Self {
        let local = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if local.is_none() {
            log::warn!("localStorage unavailable, progress will not survive a reload");
        }
        Self {
            local,
            fallback: MemoryStorage::new(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.local.is_some()
    }
}

impl Storage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match &self.local {
            Some(local) => local.get_item(key).ok().flatten(),
            None => self.fallback.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        match &self.local {
            Some(local) => local
                .set_item(key, value)
                .map_err(|e| Error::Storage(format!("{:?}", e))),
            None => self.fallback.set_item(key, value),
        }
    }

    fn remove_item(&mut self, key: &str) {
        match &self.local {
            Some(local) => {
                let _ = local.remove_item(key);
            }
            None => self.fallback.remove_item(key),
        }
    }

    fn keys(&self) -> Vec<String> {
        match &self.local {
            Some(local) => {
                let len = local.length().unwrap_or(0);
                (0..len).filter_map(|i| local.key(i).ok().flatten()).collect()
            }
            None => self.fallback.keys(),
        }
    }
}
