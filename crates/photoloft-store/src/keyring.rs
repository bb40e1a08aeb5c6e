//! Secret storage in the OS keyring, used for library credentials.

use std::marker::PhantomData;

use keyring::Entry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use photoloft_core::ports::ObjectPersistence;

/// Stores the item JSON-encoded as a single keyring secret.
///
/// On Linux this talks to the Secret Service over D-Bus; a locked or absent
/// keyring surfaces as an error rather than silently losing credentials.
pub struct KeyringPersistence<T> {
    service: String,
    account: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> KeyringPersistence<T> {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
            _marker: PhantomData,
        }
    }

    fn entry(&self) -> anyhow::Result<Entry> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl<T> ObjectPersistence<T> for KeyringPersistence<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn has_item(&self) -> bool {
        matches!(self.load_item(), Ok(Some(_)))
    }

    fn load_item(&self) -> anyhow::Result<Option<T>> {
        match self.entry()?.get_password() {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_item(&self, item: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string(item)?;
        self.entry()?.set_password(&json)?;
        debug!(service = %self.service, "secret stored in keyring");
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
