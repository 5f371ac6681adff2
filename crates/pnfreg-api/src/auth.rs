use secrecy::{ExposeSecret, SecretString};

/// Credentials presented to a VES collector.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone, Default)]
pub enum CollectorAuth {
    /// No `Authorization` header.
    #[default]
    None,
    /// HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
}

impl CollectorAuth {
    /// Basic auth from a username and an already-resolved secret.
    pub fn basic(username: impl Into<String>, password: SecretString) -> Self {
        Self::Basic {
            username: username.into(),
            password,
        }
    }

    /// Username for log context, never the password.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Basic { username, .. } => Some(username),
        }
    }

    /// Attach the credentials to an outgoing request.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::None => builder,
            Self::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }
}
