//! Command dispatch: session handling, service calls, and rendering.

use std::path::Path;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{
    SaveRequest, SaveService, SaveTarget, Workbench, WorkbenchSnapshot, WorkbenchState,
};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::config::{config_file_path, Settings};
use crate::domain::{Category, EffectiveState, FilterCriteria, Level1Node, NodeId, Taxonomy};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};

pub async fn execute_command(cli: &Cli, container: &ServiceContainer) -> InfraResult<()> {
    match &cli.command {
        Some(Commands::Generate {
            seeds,
            instructions,
        }) => generate(container, seeds.clone(), instructions.clone()).await,
        Some(Commands::Tree {
            category,
            page_kind,
            stage,
        }) => tree(container, category.as_deref(), page_kind.clone(), stage.clone()).await,
        Some(Commands::Toggle { node_id, off }) => toggle(container, node_id, !off).await,
        Some(Commands::Augment { node_id }) => augment(container, node_id).await,
        Some(Commands::Translate { node_ids }) => translate(container, node_ids).await,
        Some(Commands::Save {
            name,
            project,
            new_project,
        }) => save(container, name, project.as_deref(), new_project.as_deref()).await,
        Some(Commands::Projects) => projects(container).await,
        Some(Commands::Config { command }) => config(container, command),
        None => Ok(()),
    }
}

fn load_state(path: &Path) -> InfraResult<WorkbenchState> {
    if !path.exists() {
        return Ok(WorkbenchState::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read session {}", path.display()), e))?;
    serde_json::from_str(&content)
        .map_err(|e| InfraError::session(format!("{}: {}", path.display(), e)))
}

fn store_state(path: &Path, state: &WorkbenchState) -> InfraResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
    }
    let content = serde_json::to_string_pretty(state)
        .map_err(|e| InfraError::session(e.to_string()))?;
    std::fs::write(path, content)
        .map_err(|e| InfraError::io(format!("write session {}", path.display()), e))
}

fn workbench(container: &ServiceContainer) -> InfraResult<Workbench> {
    let settings = &container.settings;
    let state = load_state(&settings.session_file)?;
    Ok(
        Workbench::with_state(container.generation.clone(), settings.model.clone(), state)
            .target_language(settings.target_language.clone()),
    )
}

async fn persist(container: &ServiceContainer, workbench: Workbench) -> InfraResult<()> {
    let state = workbench.into_state().await;
    store_state(&container.settings.session_file, &state)
}

fn parse_node_id(raw: &str) -> InfraResult<NodeId> {
    raw.parse::<NodeId>()
        .map_err(ApplicationError::from)
        .map_err(InfraError::from)
}

#[instrument(skip(container, instructions))]
async fn generate(
    container: &ServiceContainer,
    seeds: Vec<String>,
    instructions: String,
) -> InfraResult<()> {
    let wb = workbench(container)?;
    wb.generate(seeds, instructions).await?;
    let snapshot = wb.snapshot().await;
    if let Some(tax) = &snapshot.taxonomy {
        output::success(&format!(
            "generated taxonomy: {} keyword groups",
            tax.levels.len()
        ));
    }
    persist(container, wb).await
}

async fn tree(
    container: &ServiceContainer,
    category: Option<&str>,
    page_kind: Option<String>,
    stage: Option<String>,
) -> InfraResult<()> {
    let criteria = FilterCriteria {
        category: category
            .map(Category::parse)
            .transpose()
            .map_err(ApplicationError::from)?,
        page_kind,
        stage_prefix: stage,
    };

    let wb = workbench(container)?;
    let view = wb.filtered(&criteria).await?;
    let snapshot = wb.snapshot().await;
    let tax = snapshot
        .taxonomy
        .as_ref()
        .ok_or(ApplicationError::NoTaxonomy)?;

    for rendered in render_groups(&view, tax, &snapshot) {
        println!("{}", rendered);
    }
    Ok(())
}

/// One termtree per level-1 group, nodes prefixed with tri-state markers.
fn render_groups(
    view: &[Level1Node],
    tax: &Taxonomy,
    snapshot: &WorkbenchSnapshot,
) -> Vec<Tree<String>> {
    let marker = |id: NodeId| match snapshot.selection.effective_state(tax, id) {
        EffectiveState::Checked => "[x]",
        EffectiveState::Indeterminate => "[~]",
        EffectiveState::Unchecked => "[ ]",
    };
    let overlay = |id: NodeId| {
        snapshot
            .translations
            .get(&id)
            .map(|t| format!(" → {}", t))
            .unwrap_or_default()
    };

    view.iter()
        .map(|l1| {
            let branches: Vec<Tree<String>> = l1
                .children
                .iter()
                .map(|l2| {
                    let leaves: Vec<Tree<String>> = l2
                        .terms
                        .iter()
                        .map(|term| {
                            let new_marker = if snapshot.recent.contains(&term.id) {
                                " *new*"
                            } else {
                                ""
                            };
                            Tree::new(format!(
                                "{} {} ({}){}{}",
                                marker(term.id),
                                term.text,
                                term.id,
                                overlay(term.id),
                                new_marker,
                            ))
                        })
                        .collect();
                    Tree::new(format!(
                        "{} {} [{}] ({}){}",
                        marker(l2.id),
                        l2.keyword,
                        l2.stage.label(),
                        l2.id,
                        overlay(l2.id),
                    ))
                    .with_leaves(leaves)
                })
                .collect();
            Tree::new(format!(
                "{} {} [{}, {}] ({}){}",
                marker(l1.id),
                l1.keyword,
                l1.category.label(),
                l1.page_kind,
                l1.id,
                overlay(l1.id),
            ))
            .with_leaves(branches)
        })
        .collect()
}

async fn toggle(container: &ServiceContainer, node_id: &str, checked: bool) -> InfraResult<()> {
    let id = parse_node_id(node_id)?;
    let wb = workbench(container)?;
    wb.toggle(id, checked).await?;
    let state = wb.effective_state(id).await?;
    debug!("toggled {} -> {:?}", id, state);
    persist(container, wb).await
}

async fn augment(container: &ServiceContainer, node_id: &str) -> InfraResult<()> {
    let id = parse_node_id(node_id)?;
    let wb = workbench(container)?;
    let added = wb.augment(id).await?;
    output::success(&format!("added {} new terms to {}", added, id));
    persist(container, wb).await
}

async fn translate(container: &ServiceContainer, node_ids: &[String]) -> InfraResult<()> {
    let ids: Vec<NodeId> = node_ids
        .iter()
        .map(|raw| parse_node_id(raw))
        .collect::<InfraResult<_>>()?;
    let wb = workbench(container)?;
    let applied = wb.translate(&ids).await?;
    output::success(&format!("applied {} translations", applied));
    persist(container, wb).await
}

async fn save(
    container: &ServiceContainer,
    name: &str,
    project: Option<&str>,
    new_project: Option<&str>,
) -> InfraResult<()> {
    let target = match (project, new_project) {
        (Some(id), _) => SaveTarget::Existing {
            project_id: id.to_string(),
        },
        (None, Some(project_name)) => SaveTarget::NewProject {
            project_name: project_name.to_string(),
        },
        (None, None) => {
            return Err(ApplicationError::validation(
                "pass --project <id> or --new-project <name>",
            )
            .into())
        }
    };

    let wb = workbench(container)?;
    let snapshot = wb.snapshot().await;
    let tax = snapshot
        .taxonomy
        .as_ref()
        .ok_or(ApplicationError::NoTaxonomy)?;

    let save_service: &SaveService = &container.save_service;
    let record = save_service
        .save(
            tax,
            &snapshot.selection,
            &snapshot.translations,
            SaveRequest {
                name: name.to_string(),
                target,
            },
        )
        .await?;

    output::action("saved", &format!("{:?} ({})", record.name, record.id));
    Ok(())
}

async fn projects(container: &ServiceContainer) -> InfraResult<()> {
    let projects = container.persistence.list_projects().await?;
    if projects.is_empty() {
        output::warning("no projects yet; save with --new-project to create one");
        return Ok(());
    }
    for project in projects {
        output::header(&format!("{} ({})", project.name, project.id));
        for sub in container.persistence.list_existing(&project.id).await? {
            println!(
                "  {}  saved {}  [{} groups]",
                sub.name,
                sub.saved_at.format("%Y-%m-%d %H:%M"),
                sub.pruned_hierarchy.len()
            );
        }
    }
    Ok(())
}

fn config(container: &ServiceContainer, command: &ConfigCommands) -> InfraResult<()> {
    match command {
        ConfigCommands::Init => {
            let path = config_file_path()
                .ok_or_else(|| InfraError::session("cannot determine config directory"))?;
            if path.exists() {
                output::warning(&format!("config already exists: {}", path.display()));
                return Ok(());
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
            }
            let content = Settings::default()
                .to_toml()
                .map_err(|e| InfraError::session(e.to_string()))?;
            std::fs::write(&path, content)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("wrote {}", path.display()));
            Ok(())
        }
        ConfigCommands::Show => {
            let content = container
                .settings
                .to_toml()
                .map_err(|e| InfraError::session(e.to_string()))?;
            print!("{}", content);
            Ok(())
        }
    }
}
