use crate::error::*;

/// Docker Hub namespace mirroring gcr.io, k8s.gcr.io, registry.k8s.io and ghcr.io
pub const DEFAULT_MIRROR: &str = "anjia0532";

pub const USERNAME_VAR: &str = "DOCKER_USERNAME";
pub const PASSWORD_VAR: &str = "DOCKER_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Docker Hub namespace used in place of unreachable registries
    pub mirror: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mirror: DEFAULT_MIRROR.to_string(),
        }
    }
}

/// Login for the private registry
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read `DOCKER_USERNAME` and `DOCKER_PASSWORD` through `lookup`, e.g. `std::env::var`
    ///
    /// Empty value is treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingCredential(key))
        };
        Ok(Credentials {
            username: get(USERNAME_VAR)?,
            password: get(PASSWORD_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
