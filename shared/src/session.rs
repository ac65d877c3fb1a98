//! 会话存储
//!
//! 会话是一个显式对象，构造 `ApiClient` 时把 token 传进去，不依赖任何全局状态。
//! 持久化通过 `KeyValueStore` 抽象，浏览器端由 LocalStorage 实现。

use serde::{Deserialize, Serialize};

use crate::model::UserProfile;
use crate::{STORAGE_KEY_LAST_EMAIL, STORAGE_KEY_SESSION, STORAGE_KEY_TOKEN};

#[cfg(test)]
use std::{cell::RefCell, collections::HashMap};

// =========================================================
// 存储抽象
// =========================================================

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

/// 兼容外层带 `state` 包装的旧持久化格式
#[derive(Deserialize)]
struct PersistedState {
    state: Session,
}

// =========================================================
// SessionStore
// =========================================================

pub struct SessionStore<S: KeyValueStore> {
    storage: S,
    session: Option<Session>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// 从存储恢复会话；数据损坏或 token 为空时视为未登录
    pub fn load(storage: S) -> Self {
        let session = storage
            .get(STORAGE_KEY_SESSION)
            .and_then(|raw| {
                serde_json::from_str::<Session>(&raw)
                    .or_else(|_| serde_json::from_str::<PersistedState>(&raw).map(|p| p.state))
                    .ok()
            })
            .filter(|s| !s.token.is_empty());

        if session.is_none() && storage.get(STORAGE_KEY_TOKEN).is_some() {
            log_warn!("Stored token without user profile, discarding");
            storage.delete(STORAGE_KEY_TOKEN);
        }

        Self { storage, session }
    }

    /// 登录成功后建立会话
    pub fn begin(&mut self, user: UserProfile, token: String) {
        self.session = Some(Session { user, token });
        self.persist();
    }

    pub fn update_user(&mut self, user: UserProfile) {
        if let Some(session) = self.session.as_mut() {
            session.user = user;
            self.persist();
        }
    }

    pub fn update_token(&mut self, token: String) {
        if let Some(session) = self.session.as_mut() {
            session.token = token;
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.session = None;
        self.storage.delete(STORAGE_KEY_SESSION);
        self.storage.delete(STORAGE_KEY_TOKEN);
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn station_id(&self) -> Option<crate::Id> {
        self.user().and_then(|u| u.station_id)
    }

    // --- 登录页辅助 ---

    pub fn last_email(&self) -> Option<String> {
        self.storage.get(STORAGE_KEY_LAST_EMAIL)
    }

    pub fn remember_email(&self, email: &str) {
        self.storage.set(STORAGE_KEY_LAST_EMAIL, email.trim());
    }

    fn persist(&self) {
        let Some(session) = &self.session else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                self.storage.set(STORAGE_KEY_SESSION, &raw);
                self.storage.set(STORAGE_KEY_TOKEN, &session.token);
            }
            Err(e) => log_error!("Failed to serialize session: {}", e),
        }
    }
}

// =========================================================
// 测试工具: MemoryStore
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub entries: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key).is_some()
    }
}

#[cfg(test)]
impl<S: KeyValueStore> SessionStore<S> {
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserProfile {
        UserProfile {
            id: 4,
            email: "staff@evrent.vn".into(),
            full_name: "Tran Binh".into(),
            role: "Staff".into(),
            station_id: Some(2),
            phone_number: None,
        }
    }

    #[test]
    fn test_begin_persists_and_reloads() {
        let mut store = SessionStore::load(MemoryStore::default());
        assert!(!store.is_authenticated());

        store.begin(user(), "tok".into());
        assert_eq!(store.storage().get(STORAGE_KEY_TOKEN).as_deref(), Some("tok"));

        let raw = store.storage().get(STORAGE_KEY_SESSION).unwrap();
        let storage = MemoryStore::default();
        storage.set(STORAGE_KEY_SESSION, &raw);
        let reloaded = SessionStore::load(storage);
        assert_eq!(reloaded.token(), Some("tok"));
        assert_eq!(reloaded.station_id(), Some(2));
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let mut store = SessionStore::load(MemoryStore::default());
        store.begin(user(), "tok".into());
        store.clear();

        assert!(store.user().is_none());
        assert!(store.storage().get(STORAGE_KEY_TOKEN).is_none());
        assert!(store.storage().get(STORAGE_KEY_SESSION).is_none());
    }

    #[test]
    fn test_load_wrapped_state_and_garbage() {
        let storage = MemoryStore::default();
        storage.set(
            STORAGE_KEY_SESSION,
            r#"{"state":{"user":{"id":1,"fullName":"A"},"token":"t"},"version":0}"#,
        );
        assert_eq!(SessionStore::load(storage).token(), Some("t"));

        let storage = MemoryStore::default();
        storage.set(STORAGE_KEY_SESSION, "{not json");
        storage.set(STORAGE_KEY_TOKEN, "orphan");
        let store = SessionStore::load(storage);
        assert!(!store.is_authenticated());
        assert!(store.storage().get(STORAGE_KEY_TOKEN).is_none());
    }

    #[test]
    fn test_remember_email() {
        let store = SessionStore::load(MemoryStore::default());
        store.remember_email("  a@b.vn ");
        assert_eq!(store.last_email().as_deref(), Some("a@b.vn"));
    }
}
