use crate::llm::ProviderKind;
use std::collections::HashMap;
use std::sync::RwLock;

/// String key-value access to provider API keys. Lifecycle is owned by the caller.
pub trait CredentialStore: Send + Sync {
    fn get(&self, provider: ProviderKind) -> Option<String>;
    fn set(&self, provider: ProviderKind, api_key: String);
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    keys: RwLock<HashMap<ProviderKind, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: impl IntoIterator<Item = (ProviderKind, String)>) -> Self {
        let store = Self::new();
        for (provider, key) in keys {
            if !key.trim().is_empty() {
                store.set(provider, key);
            }
        }
        store
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, provider: ProviderKind) -> Option<String> {
        match self.keys.read() {
            Ok(keys) => keys.get(&provider).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&provider).cloned(),
        }
    }

    fn set(&self, provider: ProviderKind, api_key: String) {
        let mut keys = match self.keys.write() {
            Ok(keys) => keys,
            Err(poisoned) => poisoned.into_inner(),
        };
        keys.insert(provider, api_key.trim().to_string());
    }
}

pub fn is_valid_credential(provider: ProviderKind, api_key: &str) -> bool {
    match provider.credential_marker() {
        Some(marker) => api_key.trim().starts_with(marker),
        None => false,
    }
}

pub fn has_valid_credential(store: &dyn CredentialStore, provider: ProviderKind) -> bool {
    store
        .get(provider)
        .map(|key| is_valid_credential(provider, &key))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_check_per_provider() {
        assert!(is_valid_credential(ProviderKind::OpenAI, "sk-abc123"));
        assert!(!is_valid_credential(ProviderKind::OpenAI, "hf_abc123"));
        assert!(is_valid_credential(ProviderKind::Llama, "hf_abc123"));
        assert!(!is_valid_credential(ProviderKind::Llama, ""));
        assert!(!is_valid_credential(ProviderKind::Offline, "sk-abc123"));
    }

    #[test]
    fn store_round_trip_and_blank_keys_skipped() {
        let store = InMemoryCredentialStore::with_keys(vec![
            (ProviderKind::OpenAI, "sk-live".to_string()),
            (ProviderKind::Llama, "   ".to_string())
        ]);
        assert!(has_valid_credential(&store, ProviderKind::OpenAI));
        assert!(!has_valid_credential(&store, ProviderKind::Llama));

        store.set(ProviderKind::Llama, " hf_token ".to_string());
        assert_eq!(store.get(ProviderKind::Llama).as_deref(), Some("hf_token"));
    }
}
