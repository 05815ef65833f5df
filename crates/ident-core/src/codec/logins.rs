//! External-login collection codec: one (provider, key, display name) triple
//! per binding, flattened into three parallel sequences.

use crate::{CoreError, Result as CoreErrorResult, UserLoginInfo};

/// Login removal matches on the provider alone; the provider key is not
/// compared, so with two bindings from one provider the first stored binding
/// is removed. Pending a product decision on keying removal by (provider, key).
pub const LOGIN_REMOVAL_MATCHES_PROVIDER_ONLY: bool = true;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedLogins {
    pub login_providers: Vec<String>,
    pub login_provider_keys: Vec<String>,
    pub login_provider_display_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSet {
    logins: Vec<UserLoginInfo>,
}

impl LoginSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.logins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }

    pub fn logins(&self) -> &[UserLoginInfo] {
        &self.logins
    }

    pub fn contains(&self, login_provider: &str, provider_key: &str) -> bool {
        self.logins
            .iter()
            .any(|l| l.login_provider == login_provider && l.provider_key == provider_key)
    }

    pub fn add(&mut self, login: &UserLoginInfo) {
        let display_name = login
            .provider_display_name
            .clone()
            .unwrap_or_else(|| login.login_provider.clone());

        self.logins.push(UserLoginInfo {
            login_provider: login.login_provider.clone(),
            provider_key: login.provider_key.clone(),
            provider_display_name: Some(display_name),
        });
    }

    /// Remove the first binding matching `login`; see
    /// [`LOGIN_REMOVAL_MATCHES_PROVIDER_ONLY`].
    pub fn remove(&mut self, login: &UserLoginInfo) {
        let position = self.logins.iter().position(|l| {
            l.login_provider == login.login_provider
                && (LOGIN_REMOVAL_MATCHES_PROVIDER_ONLY || l.provider_key == login.provider_key)
        });

        if let Some(index) = position {
            self.logins.remove(index);
        }
    }

    pub fn encode(&self) -> EncodedLogins {
        let mut encoded = EncodedLogins::default();
        for login in &self.logins {
            encoded.login_providers.push(login.login_provider.clone());
            encoded.login_provider_keys.push(login.provider_key.clone());
            encoded.login_provider_display_names.push(
                login
                    .provider_display_name
                    .clone()
                    .unwrap_or_else(|| login.login_provider.clone()),
            );
        }
        encoded
    }

    pub fn decode(encoded: EncodedLogins) -> CoreErrorResult<Self> {
        let EncodedLogins {
            login_providers,
            login_provider_keys,
            login_provider_display_names,
        } = encoded;

        if login_providers.len() != login_provider_keys.len()
            || login_providers.len() != login_provider_display_names.len()
        {
            return Err(CoreError::corrupt_document(format!(
                "login sequences differ in length: providers={}, keys={}, display_names={}",
                login_providers.len(),
                login_provider_keys.len(),
                login_provider_display_names.len()
            )));
        }

        let logins = login_providers
            .into_iter()
            .zip(login_provider_keys)
            .zip(login_provider_display_names)
            .map(|((provider, key), display_name)| {
                UserLoginInfo::new(provider, key, Some(display_name))
            })
            .collect();

        Ok(Self { logins })
    }
}
