pub mod diff;
pub mod types;

pub use types::{ApiPullRequest, ChangedFile, PrUrl, PullRequest};

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::GitHubConfig;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid PR URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse diff: {0}")]
    DiffParse(String),

    #[error("PR not found or is private")]
    NotFound,

    #[error("GitHub API returned {status}")]
    Upstream { status: u16 },
}

/// Files requested per PR; GitHub's maximum page size.
const FILES_PER_PAGE: u32 = 100;

/// Parse a GitHub PR URL into its component parts.
///
/// Accepts `https://github.com/{owner}/{repo}/pull/{number}` with or without
/// the scheme, and tolerates trailing segments such as `/files` or a query
/// string. Anything else is `PrError::InvalidUrl`.
pub fn parse_pr_url(url: &str) -> Result<PrUrl, PrError> {
    let invalid = || PrError::InvalidUrl(url.to_string());

    let trimmed = url.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let path = without_scheme
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    let mut segments = path.split('/').filter(|segment| !segment.is_empty());

    let host = segments.next().ok_or_else(invalid)?;
    if !host.eq_ignore_ascii_case("github.com") && !host.eq_ignore_ascii_case("www.github.com") {
        return Err(invalid());
    }

    let owner = segments.next().ok_or_else(invalid)?;
    let repo = segments.next().ok_or_else(invalid)?;
    if segments.next() != Some("pull") {
        return Err(invalid());
    }

    let pr_number = segments
        .next()
        .ok_or_else(invalid)?
        .parse::<u64>()
        .map_err(|_| invalid())?;
    if pr_number == 0 {
        return Err(invalid());
    }

    Ok(PrUrl {
        owner: owner.to_string(),
        repo: repo.to_string(),
        pr_number,
    })
}

/// Thin client over the two GitHub REST endpoints a summary needs.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(url)
            .header("User-Agent", "patchplay")
            .header("Accept", "application/vnd.github.v3+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch PR metadata and its changed files.
    ///
    /// Both requests are issued concurrently. A 404 on the PR itself maps to
    /// `PrError::NotFound`, any other failure status to `PrError::Upstream`.
    /// A failed file listing is not fatal: the PR is returned without files.
    #[instrument(skip(self), fields(owner = %pr_url.owner, repo = %pr_url.repo, pr = pr_url.pr_number))]
    pub async fn fetch_pull_request(&self, pr_url: &PrUrl) -> Result<PullRequest, PrError> {
        let base_url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_base, pr_url.owner, pr_url.repo, pr_url.pr_number
        );
        let files_url = format!("{}/files?per_page={}", base_url, FILES_PER_PAGE);

        debug!("fetching PR metadata and files from GitHub API");
        let (pr_response, files_response) =
            tokio::try_join!(self.get(&base_url).send(), self.get(&files_url).send())?;

        match pr_response.status() {
            StatusCode::NOT_FOUND => return Err(PrError::NotFound),
            status if !status.is_success() => {
                return Err(PrError::Upstream {
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let metadata = pr_response.json::<ApiPullRequest>().await?;
        debug!(title = %metadata.title, changed_files = metadata.changed_files, "received PR metadata");

        let files = if files_response.status().is_success() {
            files_response.json::<Vec<ChangedFile>>().await?
        } else {
            warn!(status = %files_response.status(), "could not list PR files, continuing without them");
            Vec::new()
        };
        debug!(files = files.len(), "received PR files");

        Ok(PullRequest::from_api(
            pr_url.repo_name(),
            pr_url.pr_number,
            metadata,
            files,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_valid_pr_url() {
        let url = parse_pr_url("https://github.com/org/repo/pull/42").unwrap();
        assert_eq!(url.owner, "org");
        assert_eq!(url.repo, "repo");
        assert_eq!(url.pr_number, 42);
    }

    #[test]
    fn test_parse_url_variants() {
        let expected = PrUrl {
            owner: "org".to_string(),
            repo: "repo".to_string(),
            pr_number: 7,
        };
        for url in [
            "github.com/org/repo/pull/7",
            "http://www.github.com/org/repo/pull/7",
            "https://github.com/org/repo/pull/7/files",
            "https://github.com/org/repo/pull/7?diff=split#top",
            "  https://github.com/org/repo/pull/7  ",
        ] {
            assert_eq!(parse_pr_url(url).unwrap(), expected, "{}", url);
        }
    }

    #[test]
    fn test_parse_invalid_pr_url() {
        assert!(parse_pr_url("https://example.com").is_err());
        assert!(parse_pr_url("not-a-url").is_err());
        assert!(parse_pr_url("").is_err());
        assert!(parse_pr_url("https://github.com/org/repo/pulls/42").is_err());
        assert!(parse_pr_url("https://github.com/org/repo/issues/42").is_err());
        assert!(parse_pr_url("https://github.com/org/repo/pull/abc").is_err());
        assert!(parse_pr_url("https://github.com/org/repo/pull/0").is_err());
        assert!(parse_pr_url("https://gitlab.com/org/repo/pull/42").is_err());
    }

    fn pr_body() -> serde_json::Value {
        serde_json::json!({
            "title": "Add OAuth2 login flow",
            "body": "Implements the login flow.",
            "user": {"login": "alice", "avatar_url": "https://avatars.example.com/alice"},
            "changed_files": 2,
            "additions": 30,
            "deletions": 4
        })
    }

    fn files_body() -> serde_json::Value {
        serde_json::json!([
            {"filename": "src/auth.rs", "status": "added", "additions": 28, "deletions": 0,
             "patch": "@@ -0,0 +1,2 @@\n+pub fn login() {}\n+pub fn logout() {}"},
            {"filename": "README.md", "status": "modified", "additions": 2, "deletions": 4}
        ])
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(&GitHubConfig {
            token: token.map(str::to_string),
            api_base: server.uri(),
        })
    }

    fn sample_url() -> PrUrl {
        parse_pr_url("https://github.com/org/repo/pull/42").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_pull_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/pulls/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pr_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/pulls/42/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(files_body()))
            .mount(&server)
            .await;

        let pr = client_for(&server, None).fetch_pull_request(&sample_url()).await.unwrap();
        assert_eq!(pr.repo_name, "org/repo");
        assert_eq!(pr.number, 42);
        assert_eq!(pr.author, "alice");
        assert_eq!(pr.author_avatar, "https://avatars.example.com/alice");
        assert_eq!((pr.files_changed, pr.additions, pr.deletions), (2, 30, 4));
        assert_eq!(pr.files.len(), 2);
        assert!(pr.files[1].patch.is_none());
    }

    #[tokio::test]
    async fn test_fetch_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/pulls/42"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pr_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/pulls/42/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(files_body()))
            .mount(&server)
            .await;

        let pr = client_for(&server, Some("secret"))
            .fetch_pull_request(&sample_url())
            .await
            .unwrap();
        assert_eq!(pr.title, "Add OAuth2 login flow");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .fetch_pull_request(&sample_url())
            .await
            .unwrap_err();
        assert!(matches!(err, PrError::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_upstream_status_passthrough() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .fetch_pull_request(&sample_url())
            .await
            .unwrap_err();
        assert!(matches!(err, PrError::Upstream { status: 403 }));
    }

    #[tokio::test]
    async fn test_fetch_tolerates_missing_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/pulls/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pr_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/pulls/42/files"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let pr = client_for(&server, None).fetch_pull_request(&sample_url()).await.unwrap();
        assert!(pr.files.is_empty());
        assert_eq!(pr.additions, 30);
    }
}
