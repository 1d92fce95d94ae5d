//! Single-slot holder for the live device authorization.
//!
//! The slot is shared by the issue and poll triggers. Writers race freely:
//! the last `replace` wins and a concurrent poll may read either code.

use std::sync::RwLock;

use crate::types::DeviceAuthorizationRequest;

/// Storage seam for the one in-flight device authorization.
pub trait DeviceCodeStore: Send + Sync {
    /// Store `request`, returning the one it supersedes.
    fn replace(&self, request: DeviceAuthorizationRequest) -> Option<DeviceAuthorizationRequest>;

    /// The live request, if any.
    fn current(&self) -> Option<DeviceAuthorizationRequest>;

    /// Empty the slot, returning what was in it.
    fn clear(&self) -> Option<DeviceAuthorizationRequest>;
}

/// Process-memory store; lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryDeviceCodeStore {
    slot: RwLock<Option<DeviceAuthorizationRequest>>,
}

impl InMemoryDeviceCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceCodeStore for InMemoryDeviceCodeStore {
    fn replace(&self, request: DeviceAuthorizationRequest) -> Option<DeviceAuthorizationRequest> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        slot.replace(request)
    }

    fn current(&self) -> Option<DeviceAuthorizationRequest> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn clear(&self) -> Option<DeviceAuthorizationRequest> {
        self.slot.write().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn request(device_code: &str) -> DeviceAuthorizationRequest {
        DeviceAuthorizationRequest {
            device_code: device_code.into(),
            user_code: format!("{device_code}-USER"),
            verification_uri: "https://example.com/devices".into(),
            expires_in: None,
            interval: None,
            issued_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn starts_empty() {
        let store = InMemoryDeviceCodeStore::new();
        assert!(store.current().is_none());
        assert!(store.clear().is_none());
    }

    #[test]
    fn replace_returns_superseded_request() {
        let store = InMemoryDeviceCodeStore::new();
        assert!(store.replace(request("D1")).is_none());

        let previous = store.replace(request("D2")).unwrap();
        assert_eq!(previous.device_code, "D1");
        assert_eq!(store.current().unwrap().device_code, "D2");
    }

    #[test]
    fn current_does_not_consume() {
        let store = InMemoryDeviceCodeStore::new();
        store.replace(request("D1"));
        assert_eq!(store.current(), store.current());
        assert_eq!(store.current().unwrap().device_code, "D1");
    }

    #[test]
    fn clear_empties_slot() {
        let store = InMemoryDeviceCodeStore::new();
        store.replace(request("D1"));
        assert_eq!(store.clear().unwrap().device_code, "D1");
        assert!(store.current().is_none());
    }

    #[test]
    fn usable_as_trait_object() {
        let store: std::sync::Arc<dyn DeviceCodeStore> =
            std::sync::Arc::new(InMemoryDeviceCodeStore::new());
        store.replace(request("D1"));
        assert_eq!(store.current().unwrap().user_code, "D1-USER");
    }
}
