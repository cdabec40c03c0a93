use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;
use skillsctl_core::{Config, GitOps, Project, SelectionPlan, SkillRecord, StageKind, SyncOutcome};
use std::fmt::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(clap::Args, Clone, Debug)]
pub struct SelectionArgs {
    /// Skill IDs
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Stage git changes
    #[arg(long)]
    pub stage: bool,
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

pub fn open_project(root: &Path) -> Result<Project> {
    let config = Config::load(root)?;
    let git = Arc::new(GitOps::new(root));
    Project::open(root, config, git)
}

/// Human-readable block for one skill, optionally with its score.
pub fn format_skill(skill: &SkillRecord, score: Option<u32>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} — {}", style(&skill.id).white().bold(), skill.title);
    if let Some(score) = score {
        let _ = write!(out, " {}", style(format!("(score: {score})")).dim());
    }
    let _ = write!(out, "\n  tags: {}", skill.tags_display());
    if !skill.description.is_empty() {
        let _ = write!(out, "\n  {}", skill.summary_line());
    }
    out
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn confirm(yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    println!();
    Confirm::new()
        .with_prompt("Proceed?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn aborted() -> ExitCode {
    println!("Aborted.");
    ExitCode::FAILURE
}

fn print_staged() {
    println!();
    println!("{} Changes staged", style("✓").green().bold());
}

pub fn catalog(root: &Path, json: bool) -> Result<ExitCode> {
    let project = open_project(root)?;
    let catalog = project.require_catalog()?;
    let skills = catalog.list_all();

    if json {
        print_json(skills)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("Available skills ({}):", skills.len());
    println!("{}", "-".repeat(40));
    for skill in skills {
        println!();
        println!("{}", format_skill(skill, None));
    }

    Ok(ExitCode::SUCCESS)
}

pub fn suggest(root: &Path, query: &str, limit: usize, json: bool) -> Result<ExitCode> {
    let project = open_project(root)?;
    let results = project.require_catalog()?.suggest(query, limit);

    if json {
        print_json(&results)?;
        return Ok(ExitCode::SUCCESS);
    }

    if results.is_empty() {
        println!("No skills found matching '{query}'");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Skills matching '{}' ({} results):", query, results.len());
    println!("{}", "-".repeat(40));
    for scored in &results {
        println!();
        println!("{}", format_skill(&scored.skill, Some(scored.score)));
    }

    Ok(ExitCode::SUCCESS)
}

async fn prepare_submodule(project: &Project) -> Result<()> {
    if project.ensure_submodule().await? {
        println!(
            "{} Skills submodule set up at {}",
            style("✓").green(),
            style(project.skills_dir().display()).cyan()
        );
    }
    Ok(())
}

fn print_changes(plan: &SelectionPlan) {
    for id in &plan.to_add {
        println!("  {} {}", style("+").green(), id);
    }
    for id in &plan.to_remove {
        println!("  {} {}", style("-").red(), id);
    }
}

pub async fn install(root: &Path, args: SelectionArgs) -> Result<ExitCode> {
    let mut project = open_project(root)?;

    prepare_submodule(&project).await?;
    project.ensure_clean().await?;
    project.reload_catalog()?;

    let plan = project.plan_install(&args.ids)?;
    if plan.is_empty() {
        println!("All specified skills are already installed.");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes {
        println!("Skills to install:");
        for id in &plan.to_add {
            let title = project
                .catalog()
                .and_then(|c| c.get(id))
                .map(|s| s.title.as_str())
                .unwrap_or_default();
            println!("  - {id}: {title}");
        }
    }
    if !confirm(args.yes)? {
        return Ok(aborted());
    }

    project.apply(&plan).await?;

    println!();
    println!(
        "{} Installed {} skill(s)",
        style("✓").green().bold(),
        plan.to_add.len()
    );
    for id in &plan.to_add {
        println!("  - {id}");
    }

    if args.stage {
        project.stage(StageKind::Install).await?;
        print_staged();
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn remove(root: &Path, args: SelectionArgs) -> Result<ExitCode> {
    let mut project = open_project(root)?;
    project.ensure_clean().await?;

    let plan = project.plan_remove(&args.ids);
    if !plan.unchanged.is_empty() {
        println!(
            "{} Not installed: {}",
            style("!").yellow(),
            plan.unchanged.join(", ")
        );
    }
    if plan.is_empty() {
        println!("No skills to remove.");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes {
        println!("Skills to remove:");
        for id in &plan.to_remove {
            println!("  - {id}");
        }
    }
    if !confirm(args.yes)? {
        return Ok(aborted());
    }

    project.apply(&plan).await?;

    println!();
    println!(
        "{} Removed {} skill(s)",
        style("✓").green().bold(),
        plan.to_remove.len()
    );
    for id in &plan.to_remove {
        println!("  - {id}");
    }

    if args.stage {
        project.stage(StageKind::Remove).await?;
        print_staged();
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn set(root: &Path, args: SelectionArgs) -> Result<ExitCode> {
    let mut project = open_project(root)?;

    project.ensure_clean().await?;
    prepare_submodule(&project).await?;
    project.reload_catalog()?;

    let plan = project.plan_set(&args.ids)?;
    if plan.is_empty() {
        println!("No changes needed.");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes {
        println!("Skill changes:");
        print_changes(&plan);
    }
    if !confirm(args.yes)? {
        return Ok(aborted());
    }

    project.apply(&plan).await?;

    println!();
    println!("{} Skills set updated", style("✓").green().bold());
    print_changes(&plan);

    if args.stage {
        project.stage(StageKind::Set).await?;
        print_staged();
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn sync(root: &Path, stage: bool) -> Result<ExitCode> {
    let mut project = open_project(root)?;

    println!("{} Updating submodule...", style("→").cyan());
    let skills = match project.sync().await? {
        SyncOutcome::NoSubmodule => {
            println!("Submodule not found. Nothing to sync.");
            return Ok(ExitCode::SUCCESS);
        }
        SyncOutcome::Synced { skills } => skills,
    };

    println!();
    println!(
        "{} Synced {} skill(s)",
        style("✓").green().bold(),
        skills.len()
    );
    for id in &skills {
        println!("  - {id}");
    }

    if stage {
        project.stage(StageKind::Sync).await?;
        print_staged();
    }

    Ok(ExitCode::SUCCESS)
}
