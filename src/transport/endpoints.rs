//! Endpoint sets per environment.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::models::Environment;
use crate::protocol::ServiceFamily;

/// Service URLs of one environment, one per operation family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    /// Hire service URL.
    pub hire: String,
    /// Termination service URL.
    pub termination: String,
}

impl EndpointSet {
    /// URL serving the given family.
    pub fn url_for(&self, family: ServiceFamily) -> &str {
        match family {
            ServiceFamily::Hire => &self.hire,
            ServiceFamily::Termination => &self.termination,
        }
    }
}

/// Test and production endpoint sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// The authority's test environment.
    pub test: EndpointSet,
    /// The production environment.
    pub production: EndpointSet,
}

impl Endpoints {
    /// Endpoint set of an environment.
    pub fn for_environment(&self, environment: Environment) -> &EndpointSet {
        match environment {
            Environment::Test => &self.test,
            Environment::Production => &self.production,
        }
    }

    /// Resolves the URL for an environment and family, requiring https.
    pub fn resolve(
        &self,
        environment: Environment,
        family: ServiceFamily,
    ) -> Result<&str, TransportError> {
        let url = self.for_environment(environment).url_for(family);
        require_https(url)?;
        Ok(url)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            test: EndpointSet {
                hire: "https://sgkt.sgk.gov.tr/WS_SgkTescil4a/WS_SgkIseGirisService".to_string(),
                termination: "https://sgkt.sgk.gov.tr/WS_SgkTescil4a/WS_SgkIstenCikisService"
                    .to_string(),
            },
            production: EndpointSet {
                hire: "https://uyg.sgk.gov.tr/WS_SgkTescil4a/WS_SgkIseGirisService".to_string(),
                termination: "https://uyg.sgk.gov.tr/WS_SgkTescil4a/WS_SgkIstenCikisService"
                    .to_string(),
            },
        }
    }
}

/// Fails with [`TransportError::InsecureEndpoint`] unless the URL is https.
pub(crate) fn require_https(url: &str) -> Result<(), TransportError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| TransportError::Client {
        message: format!("invalid endpoint url '{}': {}", url, e),
    })?;
    if parsed.scheme() != "https" {
        return Err(TransportError::InsecureEndpoint {
            url: url.to_string(),
        });
    }
    Ok(())
}
