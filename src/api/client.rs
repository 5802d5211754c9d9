use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::models::{
    AttachRequest, CustomProperty, DefaultsRequest, Membership, Organization, Repository,
    RepositoryPropertyValues, User,
};
use crate::api::pagination::collect_pages;
use crate::constants::{ACCEPT_HEADER, API_VERSION, CLOUD_API_URL, PER_PAGE, USER_AGENT};
use crate::security::configuration::SecurityConfiguration;

/// Which GitHub deployment requests go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// GitHub Enterprise Cloud / github.com.
    Cloud,
    /// GitHub Enterprise Server rooted at the given API base URL.
    Server(String),
}

impl Endpoint {
    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Cloud => CLOUD_API_URL,
            Endpoint::Server(url) => url,
        }
    }

    /// Only the public SaaS API understands the version header.
    pub fn sends_version_header(&self) -> bool {
        matches!(self, Endpoint::Cloud)
    }
}

/// GitHub REST API client
///
/// Every request carries the GitHub JSON accept header and a bearer
/// token; requests to the cloud endpoint also pin the API version.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    endpoint: Endpoint,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub API client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The deployment to talk to
    /// * `token` - Personal access token sent as a bearer token
    pub fn new(endpoint: Endpoint, token: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Transport {
                url: endpoint.base_url().to_string(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.endpoint.base_url().trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    pub(crate) fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "Requesting");

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, ACCEPT_HEADER)
            .bearer_auth(&self.token);

        if self.endpoint.sends_version_header() {
            request = request.header("X-GitHub-Api-Version", API_VERSION);
        }

        request
    }

    /// Send a request and return the raw body of a 2xx response.
    async fn send_raw(&self, request: RequestBuilder) -> Result<(String, String), ApiError> {
        let request = request.build().map_err(|source| ApiError::Transport {
            url: String::new(),
            source,
        })?;
        let url = request.url().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(%status, %url, "Response");

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read response body".to_string());

        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        Ok((url, body))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (url, body) = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    /// Send a mutation; an empty 2xx body comes back as `Value::Null`.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let request = self
            .build_request(method, path)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let (url, text) = self.send_raw(request).await?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { url, source })
    }

    /// Perform a GET request to the GitHub API
    ///
    /// # Arguments
    ///
    /// * `path` - The API path (relative to base URL) or full URL
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.build_request(Method::GET, path)).await
    }

    /// GET every page of a numbered-page listing.
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        collect_pages(PER_PAGE, move |page| {
            let request = self
                .build_request(Method::GET, path)
                .query(&[("per_page", PER_PAGE as u32), ("page", page)]);
            self.send::<Vec<T>>(request)
        })
        .await
    }

    /// Status code of a GET without interpreting the body.
    pub async fn probe(&self, path: &str) -> Result<StatusCode, ApiError> {
        match self.send_raw(self.build_request(Method::GET, path)).await {
            Ok(_) => Ok(StatusCode::OK),
            Err(ApiError::Status { status, .. }) => Ok(status),
            Err(e) => Err(e),
        }
    }

    /// List every repository in an organization
    pub async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>, ApiError> {
        self.get_all(&format!("/orgs/{}/repos?type=all", org)).await
    }

    pub async fn get_repository(&self, org: &str, repo: &str) -> Result<Repository, ApiError> {
        self.get(&format!("/repos/{}/{}", org, repo)).await
    }

    pub async fn list_repository_properties(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<CustomProperty>, ApiError> {
        self.get(&format!("/repos/{}/{}/properties/values", org, repo))
            .await
    }

    /// Custom property values for every repository of an organization.
    pub async fn list_org_property_values(
        &self,
        org: &str,
    ) -> Result<Vec<RepositoryPropertyValues>, ApiError> {
        self.get_all(&format!("/orgs/{}/properties/values", org))
            .await
    }

    pub async fn list_security_configurations(
        &self,
        org: &str,
    ) -> Result<Vec<SecurityConfiguration>, ApiError> {
        self.get(&format!("/orgs/{}/code-security/configurations", org))
            .await
    }

    pub async fn create_security_configuration(
        &self,
        org: &str,
        configuration: &SecurityConfiguration,
    ) -> Result<Value, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/orgs/{}/code-security/configurations", org),
            configuration,
        )
        .await
    }

    pub async fn update_security_configuration(
        &self,
        org: &str,
        id: u64,
        configuration: &SecurityConfiguration,
    ) -> Result<Value, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/orgs/{}/code-security/configurations/{}", org, id),
            configuration,
        )
        .await
    }

    /// Make a configuration the default for new repositories.
    pub async fn set_default_for_new_repos(
        &self,
        org: &str,
        id: u64,
        default_for_new_repos: &str,
    ) -> Result<Value, ApiError> {
        self.send_json(
            Method::PUT,
            &format!("/orgs/{}/code-security/configurations/{}/defaults", org, id),
            &DefaultsRequest {
                default_for_new_repos,
            },
        )
        .await
    }

    pub async fn attach_configuration(
        &self,
        org: &str,
        id: u64,
        repository_ids: &[u64],
    ) -> Result<Value, ApiError> {
        self.send_json(
            Method::POST,
            &format!(
                "/orgs/{}/code-security/configurations/{}/repositories",
                org, id
            ),
            &AttachRequest {
                scope: "selected",
                selected_repository_ids: repository_ids,
            },
        )
        .await
    }

    /// Get the currently authenticated user
    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.get("/user").await
    }

    pub async fn list_user_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.get_all("/user/orgs").await
    }

    pub async fn get_org_membership(&self, org: &str) -> Result<Membership, ApiError> {
        self.get(&format!("/user/memberships/orgs/{}", org)).await
    }
}
