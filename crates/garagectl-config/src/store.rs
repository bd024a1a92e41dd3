// ── Persistent settings store ──
//
// Every setter writes the config file first and only then publishes, so
// readers never see a value that failed to persist.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::debug;

use garagectl_core::{Settings, SettingsStore};

use crate::{Config, ConfigError, SystemKeyring, TokenVault, load_config, save_config};

/// Where [`FileSettingsStore::set_token`] puts the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStorage {
    /// System keyring; the plaintext entry is cleared from the file.
    Keyring,
    /// `token = "..."` in the config file; any keyring entry is removed.
    Plaintext,
}

/// [`SettingsStore`] backed by the TOML config file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    config: Mutex<Config>,
    vault: Box<dyn TokenVault>,
    tx: watch::Sender<Settings>,
}

impl FileSettingsStore {
    /// Load `path` (and `GARAGECTL_*` env vars) and resolve the token.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_config(&path)?;
        Ok(Self::from_config(config, path))
    }

    pub fn from_config(config: Config, path: impl Into<PathBuf>) -> Self {
        Self::with_vault(config, path, Box::new(SystemKeyring))
    }

    /// Like [`from_config`](Self::from_config), keeping the token in `vault`
    /// instead of the OS keyring.
    pub fn with_vault(
        config: Config,
        path: impl Into<PathBuf>,
        vault: Box<dyn TokenVault>,
    ) -> Self {
        let (tx, _) = watch::channel(config.to_settings(vault.as_ref()));
        Self {
            path: path.into(),
            config: Mutex::new(config),
            vault,
            tx,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The on-disk view, without session overrides.
    pub fn config(&self) -> Config {
        self.lock().clone()
    }

    /// Override URL and/or token for this process only. Nothing is written.
    pub fn apply_overrides(&self, url: Option<String>, token: Option<SecretString>) {
        if url.is_none() && token.is_none() {
            return;
        }
        self.tx.send_modify(|s| {
            if let Some(url) = url {
                s.base_url = url;
            }
            if let Some(token) = token {
                s.token = token;
            }
        });
    }

    pub fn set_base_url(&self, url: &str) -> Result<(), ConfigError> {
        let url = url.trim().to_owned();
        self.update(|cfg| cfg.url.clone_from(&url))?;
        self.tx.send_if_modified(|s| replace_if_changed(&mut s.base_url, url));
        Ok(())
    }

    pub fn set_open_duration(&self, secs: u32) -> Result<(), ConfigError> {
        self.update(|cfg| cfg.open_time_seconds = secs)?;
        self.tx.send_if_modified(|s| replace_if_changed(&mut s.open_duration_secs, secs));
        Ok(())
    }

    pub fn set_close_duration(&self, secs: u32) -> Result<(), ConfigError> {
        self.update(|cfg| cfg.close_time_seconds = secs)?;
        self.tx.send_if_modified(|s| replace_if_changed(&mut s.close_duration_secs, secs));
        Ok(())
    }

    pub fn set_token(&self, token: SecretString, storage: TokenStorage) -> Result<(), ConfigError> {
        match storage {
            TokenStorage::Keyring => {
                self.vault.store(token.expose_secret())?;
                self.update(|cfg| cfg.token = None)?;
            }
            TokenStorage::Plaintext => {
                let plain = token.expose_secret().to_owned();
                self.update(|cfg| cfg.token = Some(plain))?;
                // A keyring entry outranks the file, so it has to go.
                self.vault.clear()?;
            }
        }
        debug!(?storage, "token updated");
        self.tx.send_modify(|s| s.token = token);
        Ok(())
    }

    /// Apply a generic `key = value` edit, persist it, and republish the
    /// one setting it touches. Overrides on other settings survive.
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let updated = {
            let mut cfg = self.lock();
            let mut next = cfg.clone();
            next.set(key, value)?;
            save_config(&next, &self.path)?;
            *cfg = next.clone();
            next
        };
        let fresh = updated.to_settings(self.vault.as_ref());
        self.tx.send_if_modified(|s| match key {
            "url" => replace_if_changed(&mut s.base_url, fresh.base_url),
            "open_time_seconds" => {
                replace_if_changed(&mut s.open_duration_secs, fresh.open_duration_secs)
            }
            "close_time_seconds" => {
                replace_if_changed(&mut s.close_duration_secs, fresh.close_duration_secs)
            }
            // token, token_env
            _ => {
                let changed = s.token.expose_secret() != fresh.token.expose_secret();
                if changed {
                    s.token = fresh.token;
                }
                changed
            }
        });
        Ok(())
    }

    fn update(&self, edit: impl FnOnce(&mut Config)) -> Result<(), ConfigError> {
        let mut cfg = self.lock();
        let mut next = cfg.clone();
        edit(&mut next);
        save_config(&next, &self.path)?;
        *cfg = next;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

impl SettingsStore for FileSettingsStore {
    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::resolve_token_from;
    use crate::testing::MemoryVault;

    fn store(dir: &tempfile::TempDir) -> FileSettingsStore {
        FileSettingsStore::with_vault(
            Config::default(),
            dir.path().join("config.toml"),
            Box::new(MemoryVault::default()),
        )
    }

    #[test]
    fn setters_persist_before_publishing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut rx = store.subscribe();

        store.set_base_url(" gate.lan ").unwrap();
        store.set_open_duration(9).unwrap();

        assert!(rx.has_changed().unwrap());
        let current = rx.borrow_and_update().clone();
        assert_eq!(current.base_url, "gate.lan");
        assert_eq!(current.open_duration_secs, 9);

        let on_disk = load_config(store.path()).unwrap();
        assert_eq!(on_disk.url, "gate.lan");
        assert_eq!(on_disk.open_time_seconds, 9);
    }

    #[test]
    fn unchanged_url_does_not_notify() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.set_base_url("gate.lan").unwrap();

        let rx = store.subscribe();
        store.set_base_url("gate.lan").unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn plaintext_token_is_written_and_published() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store
            .set_token(SecretString::from("abc".to_owned()), TokenStorage::Plaintext)
            .unwrap();

        assert_eq!(store.current().token.expose_secret(), "abc");
        assert_eq!(load_config(store.path()).unwrap().token.as_deref(), Some("abc"));
    }

    #[test]
    fn overrides_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.apply_overrides(Some("other.lan".into()), Some(SecretString::from("t".to_owned())));

        assert_eq!(store.current().base_url, "other.lan");
        assert!(store.current().has_token());
        assert!(!store.path().exists());
        assert_eq!(store.config(), Config::default());
    }

    #[test]
    fn failed_edit_leaves_everything_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let rx = store.subscribe();

        assert!(store.set_value("close_time_seconds", "-1").is_err());

        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.config(), Config::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn set_value_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.set_value("close_time_seconds", "30").unwrap();

        assert_eq!(store.current().close_duration_secs, 30);
        assert_eq!(load_config(store.path()).unwrap().close_time_seconds, 30);
    }

    #[test]
    fn plaintext_token_replaces_keyring_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::with_vault(
            Config::default(),
            dir.path().join("config.toml"),
            Box::new(MemoryVault::holding("old")),
        );
        assert_eq!(store.current().token.expose_secret(), "old");

        store
            .set_token(SecretString::from("new".to_owned()), TokenStorage::Plaintext)
            .unwrap();

        assert_eq!(store.vault.get(), None);
        let on_disk = load_config(store.path()).unwrap();
        let resolved = resolve_token_from(&on_disk, |_| None, store.vault.as_ref()).unwrap();
        assert_eq!(resolved.expose_secret(), "new");
    }

    #[test]
    fn keyring_token_clears_plaintext_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.set_value("token", "plain").unwrap();

        store
            .set_token(SecretString::from("secret".to_owned()), TokenStorage::Keyring)
            .unwrap();

        assert_eq!(store.vault.get().as_deref(), Some("secret"));
        assert_eq!(load_config(store.path()).unwrap().token, None);
        assert_eq!(store.current().token.expose_secret(), "secret");
    }

    #[test]
    fn set_value_keeps_overrides_on_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.apply_overrides(Some("other.lan".into()), Some(SecretString::from("t".to_owned())));

        store.set_value("open_time_seconds", "8").unwrap();

        let current = store.current();
        assert_eq!(current.base_url, "other.lan");
        assert_eq!(current.token.expose_secret(), "t");
        assert_eq!(current.open_duration_secs, 8);
    }

    #[test]
    fn set_value_without_change_does_not_notify() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.set_value("url", "gate.lan").unwrap();

        let rx = store.subscribe();
        store.set_value("url", "gate.lan").unwrap();
        store.set_value("close_time_seconds", "5").unwrap();
        store.set_value("token_env", "").unwrap();

        assert!(!rx.has_changed().unwrap());
    }
}
