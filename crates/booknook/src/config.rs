//! CLI configuration: a thin wrapper around `booknook_config`.
//!
//! Adds the `GlobalOpts` flag overrides (--api-url, --token-store, etc.)
//! on top of the profile the shared crate resolves.

use std::sync::Arc;

use booknook_config::TokenStoreKind;
use booknook_core::{ClientConfig, TokenStore};

use crate::cli::{GlobalOpts, TokenStoreArg};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use booknook_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Everything a library-bound command needs to connect.
pub struct Resolved {
    pub profile_name: String,
    pub client: ClientConfig,
    pub tokens: Arc<dyn TokenStore>,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| booknook_config::DEFAULT_PROFILE.into())
}

/// Apply CLI flag overrides to a profile. Flags win over profile values.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(store) = global.token_store {
        profile.token_store = match store {
            TokenStoreArg::File => TokenStoreKind::File,
            TokenStoreArg::Keyring => TokenStoreKind::Keyring,
            TokenStoreArg::Memory => TokenStoreKind::Memory,
        };
    }
    if let Some(ref path) = global.token_file {
        profile.token_file = Some(path.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Load config, pick the profile, apply flags, and open the token store.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);
    let (profile_name, mut profile) = match cfg.resolve_profile(Some(&name)) {
        Ok(found) => found,
        // A bare --api-url is enough to run without any profile.
        Err(_) if global.api_url.is_some() => (name, Profile::default()),
        Err(_) => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
    };
    apply_overrides(&mut profile, global);

    let client = booknook_config::profile_to_client_config(&profile, &cfg.defaults)?;
    let tokens = booknook_config::token_store(&profile, &profile_name)?;
    tracing::debug!(
        profile = %profile_name,
        api = %client.api_url,
        store = %profile.token_store,
        "resolved configuration"
    );

    Ok(Resolved {
        profile_name,
        client,
        tokens,
    })
}
