// Token persistence in the OS credential store.

use booknook_core::{AuthToken, TokenStore, TokenStoreError};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::ConfigError;

const SERVICE: &str = "booknook";

/// One keyring entry per profile, keyed `<profile>/token`.
pub struct KeyringTokenStore {
    entry: keyring::Entry,
    profile: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Result<Self, ConfigError> {
        let entry = keyring::Entry::new(SERVICE, &format!("{profile_name}/token"))
            .map_err(|e| ConfigError::Keyring(e.to_string()))?;
        Ok(Self {
            entry,
            profile: profile_name.to_owned(),
        })
    }
}

impl std::fmt::Debug for KeyringTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringTokenStore")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

fn backend(err: &keyring::Error) -> TokenStoreError {
    TokenStoreError::Backend(err.to_string())
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        match self.entry.get_password() {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(AuthToken::new(raw.trim()))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(backend(&e)),
        }
    }

    fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        self.entry
            .set_password(token.secret().expose_secret())
            .map_err(|e| backend(&e))?;
        debug!(profile = %self.profile, "token saved to keyring");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(backend(&e)),
        }
    }
}
