use anyhow::{Context, Result};
use console::style;
use skillsctl_core::{Config, GitOps, Project, Vcs};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

fn header(title: &str) {
    println!("{}", style(title).white().bold());
    println!("{}", "=".repeat(40));
}

fn ok(message: impl std::fmt::Display) {
    println!("  {} {}", style("✓").green(), message);
}

fn warn(message: impl std::fmt::Display) {
    println!("  {} {}", style("!").yellow(), message);
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
    println!("  {} {}", style("❌").red(), message);
    ExitCode::FAILURE
}

pub async fn status(root: &Path, json: bool) -> Result<ExitCode> {
    // Status works without a repo URL; only the directory layout is needed.
    let config = Config::load(root).unwrap_or_else(|e| {
        tracing::debug!("Using default layout: {}", e);
        Config::default()
    });
    let project = Project::open(root, config, Arc::new(GitOps::new(root)))?;
    let report = project.status().await;

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize status")?;
        println!("{out}");
        return Ok(ExitCode::SUCCESS);
    }

    header("skillsctl status");
    println!("Git version: {}", report.git_version);
    println!("Is repository: {}", report.is_repo);
    println!("Submodule present: {}", report.submodule_present);
    println!("Submodule dirty: {}", report.submodule_dirty);
    println!();
    println!("Installed skills ({}):", report.selected_ids.len());
    if report.selected_ids.is_empty() {
        println!("  (none)");
    }
    for id in &report.selected_ids {
        println!("  - {id}");
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn doctor(root: &Path) -> Result<ExitCode> {
    let git = Arc::new(GitOps::new(root));
    let git_status = git.status().await;

    header("skillsctl doctor");

    println!();
    println!("Git version: {}", git_status.git_version);
    if git_status.git_version == "not installed" {
        return Ok(fail("Git is not installed"));
    }
    ok("Git is installed");

    if !git_status.is_repo {
        return Ok(fail("Not a git repository"));
    }
    ok("Is a git repository");

    if git_status.has_sparse_checkout {
        ok("Sparse-checkout is available");
    } else {
        warn("Sparse-checkout not initialized (will be set up on install)");
    }

    println!();
    println!("Configuration:");
    let config = match Config::load(root) {
        Ok(config) => config,
        Err(e) => return Ok(fail(e)),
    };
    ok(format!("Repo URL: {}", config.repo_url));
    ok(format!("Branch: {}", config.branch));

    let project = Project::open(root, config, git)?;
    let report = project.status().await;

    println!();
    let skills_dir = project.skills_dir().display().to_string();
    if root.join(project.skills_dir()).exists() {
        ok(format!("Skills directory exists: {skills_dir}"));
        if report.submodule_present {
            ok("Is a git submodule");
            if report.submodule_dirty {
                warn("Submodule has uncommitted changes");
            }
        } else {
            warn("Not a git submodule");
        }
    } else {
        warn(format!("Skills directory not found: {skills_dir}"));
        println!("    Run 'skillsctl install <id>' to set up");
    }

    println!();
    println!("Manifest:");
    if report.selected_ids.is_empty() {
        warn("No skills installed");
    } else {
        ok(format!("{} skill(s) installed:", report.selected_ids.len()));
        for id in &report.selected_ids {
            println!("    - {id}");
        }
    }

    println!();
    println!("{} All checks passed", style("✓").green().bold());
    Ok(ExitCode::SUCCESS)
}
