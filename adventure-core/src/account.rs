//! The logged-in user's display name.
//!
//! The name comes from a [`ProfileSource`] (the device's own contact record,
//! the environment, ...). [`UserProfileLookup`] asks the source once and keeps
//! the answer until it is explicitly invalidated. The application owns one
//! lookup and passes it to whatever needs the name.

use thiserror::Error;
use tracing::{debug, warn};

/// Errors a profile source can report.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile source unavailable: {0}")]
    Unavailable(String),

    #[error("Profile record is malformed: {0}")]
    Malformed(String),
}

/// Something that knows the current user's display name.
pub trait ProfileSource {
    /// Query the user's own profile record. `Ok(None)` means there is no record.
    fn display_name(&self) -> Result<Option<String>, ProfileError>;
}

impl<S: ProfileSource + ?Sized> ProfileSource for &S {
    fn display_name(&self) -> Result<Option<String>, ProfileError> {
        (**self).display_name()
    }
}

impl<S: ProfileSource + ?Sized> ProfileSource for Box<S> {
    fn display_name(&self) -> Result<Option<String>, ProfileError> {
        (**self).display_name()
    }
}

/// A source with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct StaticProfile(pub Option<String>);

impl StaticProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl ProfileSource for StaticProfile {
    fn display_name(&self) -> Result<Option<String>, ProfileError> {
        Ok(self.0.clone())
    }
}

/// Reads the display name from the first set, non-empty environment variable.
#[derive(Debug, Clone)]
pub struct EnvProfile {
    vars: Vec<String>,
}

impl EnvProfile {
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for EnvProfile {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PROFILE_VARS)
    }
}

impl ProfileSource for EnvProfile {
    fn display_name(&self) -> Result<Option<String>, ProfileError> {
        for var in &self.vars {
            match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => return Ok(Some(value.trim().to_string())),
                Ok(_) | Err(std::env::VarError::NotPresent) => continue,
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(ProfileError::Malformed(format!("{var} is not valid unicode")))
                }
            }
        }
        Ok(None)
    }
}

/// Caches the user's display name from a [`ProfileSource`].
#[derive(Debug)]
pub struct UserProfileLookup<S> {
    source: S,
    user_name: Option<String>,
}

impl<S: ProfileSource> UserProfileLookup<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            user_name: None,
        }
    }

    /// The user's display name, querying the source on a cache miss.
    ///
    /// Returns `None` for an unknown user. A miss is not cached, so the next
    /// call asks the source again.
    pub fn user_name(&mut self) -> Option<&str> {
        if self.user_name.is_none() {
            match self.source.display_name() {
                Ok(Some(name)) => {
                    debug!(%name, "resolved user display name");
                    self.user_name = Some(name);
                }
                Ok(None) => debug!("no profile record for current user"),
                Err(e) => warn!(error = %e, "profile lookup failed"),
            }
        }
        self.user_name.as_deref()
    }

    /// The cached name without querying.
    pub fn cached(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn is_cached(&self) -> bool {
        self.user_name.is_some()
    }

    /// Forget the cached name so the next lookup queries again.
    pub fn invalidate(&mut self) {
        self.user_name = None;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
