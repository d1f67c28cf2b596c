use cantonal_shared::KeyValueStore;
use gloo_storage::Storage;

/// Browser `localStorage`, read and written as raw strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .ok()
            .flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        if gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .is_err()
        {
            web_sys::console::warn_1(&format!("localStorage write failed for {key}").into());
        }
    }
}
