use crate::error::{PlannerError, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One step of the goal workflow. Durations are in template units
/// (half-weeks for task-level layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub id: String,
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub is_approval: bool,
}

impl TaskTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            dependencies: Vec::new(),
            is_approval: false,
        }
    }

    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn approval(mut self) -> Self {
        self.is_approval = true;
        self
    }
}

/// Largest accepted template duration, in template units.
pub const MAX_TASK_DURATION: f64 = 1_000.0;

/// The workflow every goal follows. Its critical path is eight half-weeks,
/// so an Easy goal spans roughly four weeks.
pub fn default_template() -> Vec<TaskTemplate> {
    vec![
        TaskTemplate::new("define", "Define problem statement", 1.0),
        TaskTemplate::new("scope-approval", "Scope approval", 1.0)
            .depends_on(["define"])
            .approval(),
        TaskTemplate::new("research", "Research and discovery", 2.0).depends_on(["scope-approval"]),
        TaskTemplate::new("proposal", "Draft proposal", 2.0).depends_on(["scope-approval"]),
        TaskTemplate::new("proposal-approval", "Proposal approval", 1.0)
            .depends_on(["research", "proposal"])
            .approval(),
        TaskTemplate::new("implement", "Implementation", 2.0).depends_on(["proposal-approval"]),
        TaskTemplate::new("communicate", "Communication plan", 1.0)
            .depends_on(["proposal-approval"]),
        TaskTemplate::new("sign-off", "Final sign-off", 1.0)
            .depends_on(["implement", "communicate"])
            .approval(),
    ]
}

/// Dependency graph over a template. Edges run dependency -> dependent;
/// dependency ids that name no task are dropped.
pub struct TemplateGraph {
    pub graph: DiGraph<usize, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl TemplateGraph {
    pub fn build(tasks: &[TaskTemplate]) -> Self {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();

        for (position, task) in tasks.iter().enumerate() {
            let node_ix = graph.add_node(position);
            id_to_index.entry(task.id.clone()).or_insert(node_ix);
        }

        for task in tasks {
            let Some(&dependent) = id_to_index.get(&task.id) else {
                continue;
            };
            for dependency in &task.dependencies {
                if let Some(&dep_ix) = id_to_index.get(dependency) {
                    graph.add_edge(dep_ix, dependent, ());
                }
            }
        }

        Self { graph, id_to_index }
    }

    /// Template positions in dependency order.
    pub fn topological_positions(&self, tasks: &[TaskTemplate]) -> Result<Vec<usize>> {
        let order = toposort(&self.graph, None).map_err(|cycle| PlannerError::DependencyCycle {
            task_id: tasks[self.graph[cycle.node_id()]].id.clone(),
        })?;
        Ok(order.into_iter().map(|ix| self.graph[ix]).collect())
    }
}

/// Reject templates the scheduler cannot lay out faithfully.
pub fn validate_template(tasks: &[TaskTemplate]) -> Result<()> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.id.trim().is_empty() {
            return Err(PlannerError::InvalidTemplate(format!(
                "task '{}' has an empty id",
                task.name
            )));
        }
        if !seen_ids.insert(task.id.as_str()) {
            return Err(PlannerError::InvalidTemplate(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        if !(0.0..=MAX_TASK_DURATION).contains(&task.duration) {
            return Err(PlannerError::InvalidTemplate(format!(
                "task {} has invalid duration {}",
                task.id, task.duration
            )));
        }
    }

    TemplateGraph::build(tasks).topological_positions(tasks)?;
    Ok(())
}
