//! Integration tests for the install walk.
//!
//! These tests use real git repositories created via tempfile to verify
//! the full clone/checkout/link/script lifecycle and the recursion into
//! nested manifests.

mod common;

use common::{is_full_hash, run_git, Project, UpstreamRepo};

use gitman::core::errors::Error;
use gitman::core::manifest::InstallOptions;
use gitman::core::resolver::ResolutionContext;
use gitman::core::source::{REVISION_DIRTY, REVISION_UNKNOWN};
use gitman::ui::Verbosity;

fn quiet() -> InstallOptions {
    InstallOptions {
        verbosity: Verbosity::Quiet,
        ..InstallOptions::default()
    }
}

#[test]
fn install_clones_declared_sources() {
    let upstream = UpstreamRepo::new();
    let head = upstream.head();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    let count = manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    assert_eq!(count, 1);
    let dir = project.source_dir("demo");
    assert!(dir.join("README.md").exists());
    assert_eq!(run_git(&dir, &["rev-parse", "HEAD"]), head);

    // enumeration reports the concrete state
    let statuses = manifest.get_dependencies(None, true).unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].path, dir.display().to_string());
    assert_eq!(statuses[0].url, upstream.url());
    assert_eq!(statuses[0].revision, head);
    assert!(is_full_hash(&statuses[0].revision));
}

#[test]
fn install_twice_is_idempotent() {
    let upstream = UpstreamRepo::new();
    let head = upstream.head();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    for _ in 0..2 {
        let mut ctx = ResolutionContext::new();
        let count = manifest.install_dependencies(&mut ctx, &quiet()).unwrap();
        assert_eq!(count, 1);
    }

    assert_eq!(
        run_git(&project.source_dir("demo"), &["rev-parse", "HEAD"]),
        head
    );
}

#[test]
fn install_checks_out_tags_and_hashes() {
    let upstream = UpstreamRepo::new();
    let tagged = upstream.head();
    upstream.tag("v1.0");
    let pinned = upstream.commit_file("more.txt", "more\n", "Second commit");
    upstream.commit_file("even-more.txt", "even more\n", "Third commit");

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:
  - repo: {url}
    name: tagged
    rev: v1.0
  - repo: {url}
    name: pinned
    rev: {pinned}
",
        url = upstream.url(),
        pinned = pinned
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    let count = manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        run_git(&project.source_dir("tagged"), &["rev-parse", "HEAD"]),
        tagged
    );
    assert_eq!(
        run_git(&project.source_dir("pinned"), &["rev-parse", "HEAD"]),
        pinned
    );
}

#[cfg(unix)]
#[test]
fn install_creates_configured_links() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n    link: vendor/demo\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    let link = project.path().join("vendor/demo");
    assert!(std::fs::read_link(&link).is_ok());
    assert!(link.join("README.md").exists());
}

#[cfg(unix)]
#[test]
fn install_runs_post_install_scripts() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:
  - repo: {}
    name: demo
    rev: main
    scripts:
      - touch built.flag
",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    assert!(project.source_dir("demo").join("built.flag").exists());
}

#[test]
fn nested_manifests_install_recursively() {
    let inner = UpstreamRepo::new();
    let outer = UpstreamRepo::new();
    outer.commit_file(
        "gitman.yml",
        &format!(
            "sources:\n  - repo: {}\n    name: inner\n    rev: main\n",
            inner.url()
        ),
        "Add manifest",
    );

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: outer\n    rev: main\n",
        outer.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    let count = manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    assert_eq!(count, 2);
    // nested mode: the inner source lands beneath the outer one
    let inner_dir = project
        .source_dir("outer")
        .join("gitman_sources")
        .join("inner");
    assert!(inner_dir.join("README.md").exists());
}

#[test]
fn depth_bounds_the_recursion() {
    let innermost = UpstreamRepo::new();
    let middle = UpstreamRepo::new();
    middle.commit_file(
        "gitman.yml",
        &format!(
            "sources:\n  - repo: {}\n    name: innermost\n    rev: main\n",
            innermost.url()
        ),
        "Add manifest",
    );
    let outer = UpstreamRepo::new();
    outer.commit_file(
        "gitman.yml",
        &format!(
            "sources:\n  - repo: {}\n    name: middle\n    rev: main\n",
            middle.url()
        ),
        "Add manifest",
    );

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: outer\n    rev: main\n",
        outer.url()
    ));
    let manifest = project.manifest();

    // depth 0 never touches the filesystem
    let mut ctx = ResolutionContext::new();
    let opts = InstallOptions {
        depth: Some(0),
        ..quiet()
    };
    assert_eq!(manifest.install_dependencies(&mut ctx, &opts).unwrap(), 0);
    assert!(!project.source_dir("outer").exists());

    // depth 2 stops before the innermost level
    let mut ctx = ResolutionContext::new();
    let opts = InstallOptions {
        depth: Some(2),
        ..quiet()
    };
    assert_eq!(manifest.install_dependencies(&mut ctx, &opts).unwrap(), 2);

    let middle_dir = project
        .source_dir("outer")
        .join("gitman_sources")
        .join("middle");
    assert!(middle_dir.exists());
    assert!(!middle_dir.join("gitman_sources").join("innermost").exists());
}

#[test]
fn dirty_trees_are_guarded() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    // introduce an uncommitted modification
    let dir = project.source_dir("demo");
    std::fs::write(dir.join("README.md"), "local edit\n").unwrap();

    // identify honors the allow_dirty switch
    let entry = &manifest.merged_sources(gitman::core::manifest::SourceMode::PreferLocked, true)[0];
    let status = entry.identify(&dir, true, false).unwrap();
    assert_eq!(status.revision, REVISION_DIRTY);
    let err = entry.identify(&dir, false, false).unwrap_err();
    assert!(matches!(err, Error::UncommittedChanges { .. }));

    // a plain install refuses to overwrite the edit
    let mut ctx = ResolutionContext::new();
    let err = manifest.install_dependencies(&mut ctx, &quiet()).unwrap_err();
    assert!(matches!(err, Error::UncommittedChanges { .. }));
    assert_eq!(
        std::fs::read_to_string(dir.join("README.md")).unwrap(),
        "local edit\n"
    );

    // --skip-changes leaves the source alone and counts nothing
    let mut ctx = ResolutionContext::new();
    let opts = InstallOptions {
        skip_changes: true,
        ..quiet()
    };
    assert_eq!(manifest.install_dependencies(&mut ctx, &opts).unwrap(), 0);

    // --force discards the edit
    let mut ctx = ResolutionContext::new();
    let opts = InstallOptions {
        force: true,
        ..quiet()
    };
    assert_eq!(manifest.install_dependencies(&mut ctx, &opts).unwrap(), 1);
    assert_ne!(
        std::fs::read_to_string(dir.join("README.md")).unwrap(),
        "local edit\n"
    );
}

#[test]
fn group_filters_select_exactly_their_members() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:
  - repo: {url}
    name: a
    rev: main
  - repo: {url}
    name: b
    rev: main
  - repo: {url}
    name: c
    rev: main
groups:
  - name: pair
    members: [a, b]
",
        url = upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    let opts = InstallOptions {
        names: vec!["pair".to_string()],
        ..quiet()
    };
    let count = manifest.install_dependencies(&mut ctx, &opts).unwrap();

    assert_eq!(count, 2);
    assert!(project.source_dir("a").exists());
    assert!(project.source_dir("b").exists());
    assert!(!project.source_dir("c").exists());
}

#[test]
fn unknown_names_force_a_zero_count_even_with_valid_ones() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    let opts = InstallOptions {
        names: vec!["demo".to_string(), "ghost".to_string()],
        ..quiet()
    };
    let count = manifest.install_dependencies(&mut ctx, &opts).unwrap();

    // the valid name still installed, but the call reports failure
    assert_eq!(count, 0);
    assert!(project.source_dir("demo").exists());
}

#[test]
fn uninstall_removes_everything() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    manifest.install_dependencies(&mut ctx, &quiet()).unwrap();

    manifest.uninstall_dependencies(false, false).unwrap();
    assert!(!manifest.location_path().exists());

    // enumeration now reports markers instead of failing
    let statuses = manifest.get_dependencies(None, true).unwrap();
    assert_eq!(statuses[0].revision, REVISION_UNKNOWN);
}

#[test]
fn uninstall_refuses_dirty_sources_without_force() {
    let upstream = UpstreamRepo::new();

    let project = Project::new();
    project.write_manifest(&format!(
        "sources:\n  - repo: {}\n    name: demo\n    rev: main\n",
        upstream.url()
    ));

    let manifest = project.manifest();
    let mut ctx = ResolutionContext::new();
    manifest.install_dependencies(&mut ctx, &quiet()).unwrap();
    std::fs::write(project.source_dir("demo").join("README.md"), "edit\n").unwrap();

    let err = manifest.uninstall_dependencies(false, false).unwrap_err();
    assert!(matches!(err, Error::UncommittedChanges { .. }));
    assert!(manifest.location_path().exists());

    manifest.uninstall_dependencies(true, false).unwrap();
    assert!(!manifest.location_path().exists());
}
