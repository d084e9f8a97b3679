//! GitHub remote addresses.

const SSH_PREFIX: &str = "git@github.com:";
const HTTPS_PREFIX: &str = "https://github.com/";
const REPO_SUFFIX: &str = ".git";

/// Address of a GitHub repository given as `owner/repo`.
///
/// `standard_suffix` appends `.git`; leave it off for browser-facing URLs.
/// The repository name is not validated, a malformed one fails later in git.
pub fn github_remote(repository: &str, use_ssh: bool, standard_suffix: bool) -> String {
    let prefix = if use_ssh { SSH_PREFIX } else { HTTPS_PREFIX };
    let suffix = if standard_suffix { REPO_SUFFIX } else { "" };
    format!("{prefix}{repository}{suffix}")
}

/// Repository settings page, where the Pages source is chosen.
pub fn settings_url(repository: &str) -> String {
    format!("{}/settings", github_remote(repository, false, false))
}
