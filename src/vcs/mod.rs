//! Version control setup for a new project.
//!
//! [`init_local`] turns the project root into a git repository with the
//! fixed ignore rules. [`publish_remote`] creates the repository on the
//! remote host, commits everything and pushes. Each step of the publish flow
//! aborts the rest on failure; nothing is rolled back, but a rerun picks up
//! where the last one stopped: a clean tree is not committed again and an
//! existing `origin` is repointed instead of added.

pub mod git;
pub mod github;

pub use git::Git;
pub use github::{CreatedRepository, GitHubClient, GitHubToken, RemoteHost, Visibility};

use crate::config::GitHubSettings;
use crate::config::GitSettings;
use crate::error::{Result, SproutError};
use std::fs;

/// Ignore-rule file written by [`init_local`].
pub const GITIGNORE: &str = ".gitignore";

/// What [`publish_remote`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Owner of the remote repository.
    pub owner: String,

    /// URL added as `origin`.
    pub remote_url: String,

    /// The repository already existed on the host.
    pub already_existed: bool,
}

/// `git init`, then overwrite `.gitignore` with `ignore_rules`.
pub fn init_local(git: &Git<'_>, ignore_rules: &str) -> Result<()> {
    git.init()?;
    let path = git.root().join(GITIGNORE);
    fs::write(&path, ignore_rules).map_err(|e| SproutError::io(&path, e))?;
    tracing::debug!("Initialized repository in {}", git.root().display());
    Ok(())
}

/// SSH remote URL for `owner/name`.
pub fn remote_url(ssh_host: &str, owner: &str, name: &str) -> String {
    format!("{}:{}/{}.git", ssh_host, owner, name)
}

/// Create the remote repository, commit, add `origin` and push.
pub fn publish_remote(
    git: &Git<'_>,
    host: &dyn RemoteHost,
    name: &str,
    visibility: Visibility,
    github: &GitHubSettings,
    settings: &GitSettings,
) -> Result<PublishOutcome> {
    let (created_owner, already_existed) = match host.create_repository(name, visibility) {
        Ok(repo) => (repo.owner, false),
        Err(SproutError::RemoteConflict { .. }) => {
            tracing::warn!("Repository '{}' already exists, pushing to it", name);
            (None, true)
        }
        Err(e) => return Err(e),
    };

    git.add_all()?;
    if git.has_changes()? {
        git.commit(&settings.commit_message)?;
    } else {
        tracing::info!("Nothing new to commit in {}", git.root().display());
    }

    let owner = match (github.username.clone(), created_owner) {
        (Some(username), _) => username,
        (None, Some(owner)) => owner,
        (None, None) => host.current_user()?,
    };
    let url = remote_url(&github.ssh_host, &owner, name);
    if git.has_remote("origin")? {
        git.set_remote_url("origin", &url)?;
    } else {
        git.add_remote("origin", &url)?;
    }

    git.rename_branch(&settings.default_branch)?;
    git.push_upstream("origin", &settings.default_branch)?;

    Ok(PublishOutcome {
        owner,
        remote_url: url,
        already_existed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use std::cell::Cell;
    use std::path::Path;
    use tempfile::TempDir;

    /// Remote host returning a canned result.
    struct FakeHost {
        create: fn(&str) -> Result<CreatedRepository>,
        user_calls: Cell<usize>,
    }

    impl FakeHost {
        fn new(create: fn(&str) -> Result<CreatedRepository>) -> Self {
            Self {
                create,
                user_calls: Cell::new(0),
            }
        }
    }

    impl RemoteHost for FakeHost {
        fn create_repository(&self, name: &str, _: Visibility) -> Result<CreatedRepository> {
            (self.create)(name)
        }

        fn current_user(&self) -> Result<String> {
            self.user_calls.set(self.user_calls.get() + 1);
            Ok("looked-up".to_string())
        }
    }

    fn created(name: &str) -> Result<CreatedRepository> {
        Ok(CreatedRepository {
            name: name.to_string(),
            owner: Some("octocat".to_string()),
        })
    }

    fn conflict(name: &str) -> Result<CreatedRepository> {
        Err(SproutError::RemoteConflict {
            name: name.to_string(),
        })
    }

    fn server_error(_: &str) -> Result<CreatedRepository> {
        Err(SproutError::RemoteApi {
            status: 500,
            message: "boom".into(),
        })
    }

    const PUBLISH_COMMANDS: [&str; 7] = [
        "git add .",
        "git status --porcelain",
        "git commit -m Initial commit",
        "git remote",
        "git remote add origin git@github.com:octocat/demo.git",
        "git branch -M main",
        "git push -u origin main",
    ];

    /// A repository right after `git init` with untracked template files.
    fn fresh_repo() -> MockRunner {
        MockRunner::new().respond_with("git status", "?? main.py\n")
    }

    #[test]
    fn init_local_overwrites_gitignore() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(GITIGNORE), "custom\n").unwrap();
        let runner = MockRunner::new();

        init_local(&Git::new(&runner, temp.path()), ".venv/\n").unwrap();

        assert_eq!(runner.commands(), vec!["git init"]);
        assert_eq!(
            fs::read_to_string(temp.path().join(GITIGNORE)).unwrap(),
            ".venv/\n"
        );
    }

    #[test]
    fn init_failure_writes_no_gitignore() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new().without_tool("git");

        assert!(init_local(&Git::new(&runner, temp.path()), ".venv/\n").is_err());
        assert!(!temp.path().join(GITIGNORE).exists());
    }

    #[test]
    fn publish_runs_full_sequence() {
        let runner = fresh_repo();
        let host = FakeHost::new(created);

        let outcome = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &GitHubSettings::default(),
            &GitSettings::default(),
        )
        .unwrap();

        assert_eq!(runner.commands(), PUBLISH_COMMANDS.to_vec());
        assert_eq!(outcome.remote_url, "git@github.com:octocat/demo.git");
        assert!(!outcome.already_existed);
        assert_eq!(host.user_calls.get(), 0);
    }

    #[test]
    fn conflict_still_commits_and_pushes() {
        let runner = fresh_repo();
        let host = FakeHost::new(conflict);
        let github = GitHubSettings {
            username: Some("octocat".into()),
            ..Default::default()
        };

        let outcome = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Private,
            &github,
            &GitSettings::default(),
        )
        .unwrap();

        assert!(outcome.already_existed);
        assert_eq!(runner.commands(), PUBLISH_COMMANDS.to_vec());
    }

    #[test]
    fn conflict_without_username_looks_up_owner() {
        let runner = fresh_repo();
        let host = FakeHost::new(conflict);

        let outcome = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &GitHubSettings::default(),
            &GitSettings::default(),
        )
        .unwrap();

        assert_eq!(outcome.owner, "looked-up");
        assert_eq!(host.user_calls.get(), 1);
    }

    #[test]
    fn other_host_errors_stop_before_commit() {
        let runner = fresh_repo();
        let host = FakeHost::new(server_error);

        let err = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &GitHubSettings::default(),
            &GitSettings::default(),
        )
        .unwrap_err();

        assert!(matches!(err, SproutError::RemoteApi { status: 500, .. }));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn failed_commit_stops_the_push() {
        let runner = fresh_repo().fail_when("git commit", 1);
        let host = FakeHost::new(created);

        let err = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &GitHubSettings::default(),
            &GitSettings::default(),
        )
        .unwrap_err();

        assert!(matches!(err, SproutError::CommandFailed { .. }));
        assert!(!runner.ran("git push"));
    }

    #[test]
    fn custom_branch_and_message() {
        let runner = fresh_repo();
        let host = FakeHost::new(created);
        let settings = GitSettings {
            default_branch: "trunk".into(),
            commit_message: "chore: scaffold".into(),
        };

        publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &GitHubSettings::default(),
            &settings,
        )
        .unwrap();

        assert!(runner.ran("git commit -m chore: scaffold"));
        assert!(runner.ran("git push -u origin trunk"));
    }

    #[test]
    fn repeated_push_failure_leaves_commit_and_origin_alone() {
        let runner = MockRunner::new()
            .respond_with("git remote", "origin\n")
            .fail_when("git push", 128);
        let host = FakeHost::new(conflict);
        let github = GitHubSettings {
            username: Some("octocat".into()),
            ..Default::default()
        };

        let err = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &github,
            &GitSettings::default(),
        )
        .unwrap_err();

        assert!(matches!(err, SproutError::CommandFailed { code: Some(128), .. }));

        assert!(!runner.ran("git commit"));
        assert!(!runner.ran("git remote add"));
        assert!(runner.ran("git remote set-url origin git@github.com:octocat/demo.git"));
        assert!(runner.ran("git push -u origin main"));
    }

    #[test]
    fn rerun_pushes_once_the_remote_is_reachable() {
        let runner = MockRunner::new().respond_with("git remote", "origin\n");
        let host = FakeHost::new(conflict);
        let github = GitHubSettings {
            username: Some("octocat".into()),
            ..Default::default()
        };

        let outcome = publish_remote(
            &Git::new(&runner, Path::new("/p")),
            &host,
            "demo",
            Visibility::Public,
            &github,
            &GitSettings::default(),
        )
        .unwrap();

        assert!(outcome.already_existed);
        assert_eq!(
            runner.commands(),
            vec![
                "git add .",
                "git status --porcelain",
                "git remote",
                "git remote set-url origin git@github.com:octocat/demo.git",
                "git branch -M main",
                "git push -u origin main",
            ]
        );
    }
}
