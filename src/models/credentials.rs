//! Credentials and environment selection.
//!
//! Credentials are resolved by the caller's storage layer and handed to the
//! gateway as a plain value. The gateway never reads them from disk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which endpoint set of the service a gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// The authority's test environment.
    #[default]
    Test,
    /// The live production environment.
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Workplace credentials for the registration service.
///
/// Once handed to a gateway the value is not mutated; switching environment
/// produces a new value through [`Credentials::with_environment`].
///
/// # Example
///
/// ```
/// use sgk_gateway::models::{Credentials, Environment};
///
/// let credentials = Credentials::new(
///     "12345678901",
///     "workplace-secret",
///     "12345678901234567890123456",
///     Environment::Test,
/// )
/// .with_system_password("system-secret");
///
/// assert_eq!(credentials.username(), "12345678901");
/// assert!(!format!("{:?}", credentials).contains("workplace-secret"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
    employer_registry_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system_password: Option<String>,
    #[serde(default)]
    environment: Environment,
}

impl Credentials {
    /// Creates credentials without a system password.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        employer_registry_id: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            employer_registry_id: employer_registry_id.into(),
            system_password: None,
            environment,
        }
    }

    /// Sets the optional system password.
    pub fn with_system_password(mut self, system_password: impl Into<String>) -> Self {
        self.system_password = Some(system_password.into());
        self
    }

    /// Returns a copy that targets another environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// The service username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The workplace password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The 26-digit employer registry id.
    pub fn employer_registry_id(&self) -> &str {
        &self.employer_registry_id
    }

    /// The system password, if one was configured.
    pub fn system_password(&self) -> Option<&str> {
        self.system_password.as_deref()
    }

    /// The target environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("employer_registry_id", &self.employer_registry_id)
            .field(
                "system_password",
                &self.system_password.as_ref().map(|_| "<redacted>"),
            )
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_credentials() -> Credentials {
        Credentials::new(
            "12345678901",
            "secret",
            "12345678901234567890123456",
            Environment::Test,
        )
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let credentials = create_test_credentials().with_system_password("system");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("\"system\""));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("12345678901234567890123456"));
    }

    #[test]
    fn test_with_environment_keeps_other_fields() {
        let credentials = create_test_credentials().with_environment(Environment::Production);
        assert_eq!(credentials.environment(), Environment::Production);
        assert_eq!(credentials.password(), "secret");
        assert_eq!(credentials.system_password(), None);
    }

    #[test]
    fn test_deserialize_defaults_environment_to_test() {
        let json = r#"{
            "username": "12345678901",
            "password": "secret",
            "employer_registry_id": "12345678901234567890123456"
        }"#;
        let credentials: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(credentials.environment(), Environment::Test);
        assert_eq!(credentials.system_password(), None);
    }

    #[test]
    fn test_environment_serialization() {
        assert_eq!(
            serde_json::to_string(&Environment::Production).unwrap(),
            "\"production\""
        );
        assert_eq!(Environment::Test.to_string(), "test");
    }
}
