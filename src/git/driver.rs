//! git::driver
//!
//! Git driver implementation backed by the system `git` binary.
//!
//! The exact flag sequences follow plain git usage; anything clever lives
//! in the engine, not here. Clones go through a shared `--reference` mirror
//! cache keyed by repository name so many sources with the same remote pay
//! for one transfer.
//!
//! # Environment
//!
//! - `GITMAN_CACHE`: overrides the mirror cache directory
//!   (default `~/.gitcache`)
//! - `GITMAN_CACHE_DISABLE`: set to any value to clone without a reference

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};
use crate::shell;

use super::VcsDriver;

const GIT: &str = "git";

/// Git driver that shells out to the system `git` binary.
pub struct GitCli {
    /// Mirror cache directory; `None` disables reference clones.
    cache_dir: Option<PathBuf>,
}

impl GitCli {
    /// Build a driver from the process environment.
    pub fn from_env() -> Self {
        let cache_dir = if std::env::var_os("GITMAN_CACHE_DISABLE").is_some() {
            None
        } else if let Some(dir) = std::env::var_os("GITMAN_CACHE") {
            Some(PathBuf::from(dir))
        } else {
            dirs::home_dir().map(|home| home.join(".gitcache"))
        };

        GitCli { cache_dir }
    }

    /// Build a driver with an explicit cache directory (`None` = no cache).
    pub fn with_cache(cache_dir: Option<PathBuf>) -> Self {
        GitCli { cache_dir }
    }

    /// Ensure a mirror of `repo` exists in the cache, returning its path.
    fn reference_for(&self, repo: &str) -> Option<PathBuf> {
        let cache = self.cache_dir.as_deref()?;
        let mirror = cache.join(format!("{}.reference", repo_key(repo)));
        if !mirror.is_dir() {
            fs::create_dir_all(cache).ok()?;
            let mirror_path = path_str(&mirror);
            shell::run(cache, GIT, ["clone", "--mirror", repo, mirror_path.as_str()]).ok()?;
        }
        Some(mirror)
    }

    /// Resolve a revision spec to something `git checkout` accepts.
    ///
    /// A `branch@{timestamp}` expression checks out the branch portion, then
    /// resolves the last commit on it at or before the timestamp. Anything
    /// else is passed through literally.
    fn resolve_rev(&self, dir: &Path, rev: &str) -> Result<String> {
        let Some((branch, date)) = split_date_expression(rev) else {
            return Ok(rev.to_string());
        };

        shell::run(dir, GIT, ["checkout", "--force", branch])?;
        let before = format!("--before={}", date);
        let sha = shell::run(
            dir,
            GIT,
            ["rev-list", "-n", "1", before.as_str(), "--first-parent", branch],
        )?;

        let sha = sha.trim().to_string();
        if sha.is_empty() {
            return Err(Error::invalid_config(format!(
                "no commit on `{}` at or before {}",
                branch, date
            )));
        }
        Ok(sha)
    }
}

impl VcsDriver for GitCli {
    fn clone_repo(&self, repo: &str, dir: &Path, rev: &str, sparse_paths: &[String]) -> Result<()> {
        if let Some(parent) = dir.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io(format!("creating {}", parent.display()), err))?;
        }

        if !sparse_paths.is_empty() {
            // Sparse checkouts are assembled in place: init, restrict the
            // tree, then fetch and check out the requested revision.
            fs::create_dir_all(dir)
                .map_err(|err| Error::io(format!("creating {}", dir.display()), err))?;
            shell::run(dir, GIT, ["init"])?;
            shell::run(dir, GIT, ["config", "core.sparseCheckout", "true"])?;
            shell::run(dir, GIT, ["remote", "add", "-f", "origin", repo])?;

            let patterns = sparse_paths.join("\n") + "\n";
            let sparse_file = dir.join(".git/info/sparse-checkout");
            fs::write(&sparse_file, patterns)
                .map_err(|err| Error::io(format!("writing {}", sparse_file.display()), err))?;

            // A date expression cannot be checked out before history exists;
            // its branch portion is enough of a hint here.
            let hint = split_date_expression(rev).map_or(rev, |(branch, _)| branch);
            shell::run(dir, GIT, ["checkout", hint])?;
            return Ok(());
        }

        let parent = dir.parent().unwrap_or(Path::new("."));
        let target = path_str(dir);
        if let Some(mirror) = self.reference_for(repo) {
            let mirror_path = path_str(&mirror);
            shell::run(
                parent,
                GIT,
                [
                    "clone",
                    "--reference-if-able",
                    mirror_path.as_str(),
                    repo,
                    target.as_str(),
                ],
            )?;
        } else {
            shell::run(parent, GIT, ["clone", repo, target.as_str()])?;
        }
        Ok(())
    }

    fn rebuild(&self, dir: &Path, repo: &str) -> Result<()> {
        fs::create_dir_all(dir)
            .map_err(|err| Error::io(format!("creating {}", dir.display()), err))?;
        shell::run(dir, GIT, ["init"])?;
        shell::run_ignored(dir, GIT, ["remote", "rm", "origin"]);
        shell::run(dir, GIT, ["remote", "add", "origin", repo])?;
        Ok(())
    }

    fn fetch(&self, dir: &Path, _repo: &str, rev: &str) -> Result<()> {
        let mut args = vec!["fetch", "--tags", "--force", "--prune", "origin"];
        // Hashes and reflog expressions are not fetchable refs.
        if !is_full_hash(rev) && !rev.contains("@{") {
            args.push(rev);
        }
        shell::run(dir, GIT, args)?;
        Ok(())
    }

    fn valid(&self, dir: &Path) -> bool {
        let Ok(output) = shell::run_unchecked(dir, GIT, ["rev-parse", "--show-toplevel"]) else {
            return false;
        };
        if !output.success {
            return false;
        }

        let toplevel = PathBuf::from(output.text.trim());
        match (toplevel.canonicalize(), dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn changes(&self, dir: &Path, include_untracked: bool) -> bool {
        shell::run_ignored(dir, GIT, ["update-index", "-q", "--refresh"]);

        match shell::run_unchecked(dir, GIT, ["diff-index", "--quiet", "HEAD", "--"]) {
            Ok(output) if !output.success => return true,
            Ok(_) => {}
            Err(_) => return false,
        }

        if include_untracked {
            match shell::run_unchecked(dir, GIT, ["ls-files", "--others", "--exclude-standard"]) {
                Ok(output) => return output.success && !output.text.is_empty(),
                Err(_) => return false,
            }
        }

        false
    }

    fn update(&self, dir: &Path, _repo: &str, rev: &str, clean: bool, fetch: bool) -> Result<()> {
        shell::run_ignored(dir, GIT, ["stash"]);

        if clean {
            shell::run(dir, GIT, ["clean", "--force", "-d", "-x"])?;
        }

        let target = self.resolve_rev(dir, rev)?;
        shell::run(dir, GIT, ["checkout", "--force", target.as_str()])?;

        // Only applies when the revision names a branch; harmless otherwise.
        let upstream = format!("origin/{}", rev);
        shell::run_ignored(
            dir,
            GIT,
            ["branch", "--set-upstream-to", upstream.as_str()],
        );

        if fetch {
            shell::run_ignored(dir, GIT, ["pull", "--ff-only", "--no-rebase"]);
        }

        Ok(())
    }

    fn get_url(&self, dir: &Path) -> Result<String> {
        let url = shell::run(dir, GIT, ["config", "--get", "remote.origin.url"])?;
        Ok(url.trim().to_string())
    }

    fn get_hash(&self, dir: &Path) -> Result<String> {
        let hash = shell::run(dir, GIT, ["rev-parse", "HEAD"])?;
        Ok(hash.trim().to_string())
    }

    fn get_branch(&self, dir: &Path) -> Option<String> {
        let output = shell::run_unchecked(dir, GIT, ["rev-parse", "--abbrev-ref", "HEAD"]).ok()?;
        if !output.success {
            return None;
        }
        let branch = output.text.trim();
        if branch.is_empty() || branch == "HEAD" {
            None
        } else {
            Some(branch.to_string())
        }
    }

    fn get_tag(&self, dir: &Path) -> Option<String> {
        let output = shell::run_unchecked(dir, GIT, ["describe", "--tags", "--exact-match"]).ok()?;
        if output.success && !output.text.is_empty() {
            Some(output.text.trim().to_string())
        } else {
            None
        }
    }
}

/// Cache key for a repository URL: its last path segment, minus `.git`.
fn repo_key(repo: &str) -> String {
    let tail = repo
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(repo);
    tail.trim_end_matches(".git").to_string()
}

/// Whether `rev` is a full 40-character commit hash.
fn is_full_hash(rev: &str) -> bool {
    rev.len() == 40 && rev.chars().all(|c| c.is_ascii_hexdigit())
}

/// Split a `branch@{timestamp}` expression into its parts.
fn split_date_expression(rev: &str) -> Option<(&str, &str)> {
    let (branch, rest) = rev.split_once("@{")?;
    let date = rest.strip_suffix('}')?;
    if branch.is_empty() || date.is_empty() {
        return None;
    }
    Some((branch, date))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
