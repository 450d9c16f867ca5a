use serde::Deserialize;

use crate::script::Meta;

/// A pull request as fetched from the GitHub API: metadata plus the
/// per-file change list.
#[derive(Debug, Clone)]
pub struct PullRequest {
    /// "owner/name"
    pub repo_name: String,
    /// PR number (e.g., 42)
    pub number: u64,
    pub title: String,
    /// PR description, if any
    pub body: Option<String>,
    /// Author's GitHub login
    pub author: String,
    pub author_avatar: String,
    /// Total files changed
    pub files_changed: u64,
    /// Total lines added
    pub additions: u64,
    /// Total lines deleted
    pub deletions: u64,
    pub files: Vec<ChangedFile>,
}

impl PullRequest {
    /// Merge the two GitHub API responses into one record.
    pub fn from_api(repo_name: String, number: u64, api: ApiPullRequest, files: Vec<ChangedFile>) -> Self {
        PullRequest {
            repo_name,
            number,
            title: api.title,
            body: api.body,
            author: api.user.login,
            author_avatar: api.user.avatar_url,
            files_changed: api.changed_files,
            additions: api.additions,
            deletions: api.deletions,
            files,
        }
    }

    /// The metadata record carried into the video script.
    pub fn meta(&self) -> Meta {
        Meta {
            repo_name: self.repo_name.clone(),
            pr_number: self.number,
            pr_title: self.title.clone(),
            author: self.author.clone(),
            author_avatar: self.author_avatar.clone(),
            files_changed: self.files_changed,
            additions: self.additions,
            deletions: self.deletions,
        }
    }
}

/// Response body of `GET /repos/{owner}/{repo}/pulls/{number}`, reduced to
/// the fields used here.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequest {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: ApiUser,
    pub changed_files: u64,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub status: Option<String>,
    pub additions: u64,
    pub deletions: u64,
    /// Unified-diff hunks; absent for binary or very large files.
    #[serde(default)]
    pub patch: Option<String>,
}

/// A contiguous region of changes within a file patch.
#[derive(Debug, Clone)]
pub struct Hunk {
    /// Starting line number in the old file
    pub old_start: usize,
    /// Number of lines in the old file
    pub old_count: usize,
    /// Starting line number in the new file
    pub new_start: usize,
    /// Number of lines in the new file
    pub new_count: usize,
    /// Raw lines of the hunk (prefixed with +, -, or space)
    pub lines: Vec<String>,
}

/// Represents the parsed components of a GitHub PR URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrUrl {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

impl PrUrl {
    pub fn repo_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_from_pull_request() {
        let pr = PullRequest {
            repo_name: "org/repo".to_string(),
            number: 42,
            title: "Add OAuth2 login flow".to_string(),
            body: None,
            author: "alice".to_string(),
            author_avatar: "https://example.com/alice.png".to_string(),
            files_changed: 7,
            additions: 320,
            deletions: 45,
            files: vec![],
        };
        let meta = pr.meta();
        assert_eq!(meta.repo_name, "org/repo");
        assert_eq!(meta.pr_number, 42);
        assert_eq!(meta.author, "alice");
        assert_eq!(meta.additions, 320);
    }

    #[test]
    fn test_changed_file_without_patch() {
        let file: ChangedFile = serde_json::from_str(
            r#"{"filename": "logo.png", "status": "added", "additions": 0, "deletions": 0}"#,
        )
        .unwrap();
        assert!(file.patch.is_none());
        assert_eq!(file.status.as_deref(), Some("added"));
    }

    #[test]
    fn test_pr_url_repo_name() {
        let url = PrUrl {
            owner: "org".to_string(),
            repo: "repo".to_string(),
            pr_number: 42,
        };
        assert_eq!(url.repo_name(), "org/repo");
    }
}
