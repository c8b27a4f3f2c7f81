//! Hierarchy assembly
//!
//! Rebuilds the Release → Stage → Step tree from the flat row-sets of a
//! [`ReleaseBatch`]. Assembly is pure and deterministic: the same batch always
//! yields the same tree.
//!
//! Workflows, environments and steps are indexed by key up front so the nested
//! traversal stays close to linear in the number of rows. Indexing keeps the
//! row-set order within each key, and all sorts are stable, so the emitted
//! order is exactly what a plain scan over the row-sets would produce.

use std::collections::{HashMap, HashSet};

use crate::domain::{Release, ReleaseBatch, Stage, Step};
use crate::dto::{ReleaseNode, StageNode, StepNode};
use crate::error::{DashboardError, Result};

/// Assemble the release tree from a fetched batch
///
/// Releases keep the batch order. Under each release, stages linked to it by
/// a workflow row appear ordered by rank; under each stage, the release's
/// steps for that stage appear ordered by attempt, then step rank.
///
/// Steps that cannot be placed under any emitted (release, stage) pair are
/// dropped. A stage whose environment is missing from the batch fails the
/// whole assembly.
pub fn assemble(batch: &ReleaseBatch) -> Result<Vec<ReleaseNode>> {
    let index = BatchIndex::build(batch);

    batch
        .releases
        .iter()
        .map(|release| assemble_release(release, batch, &index))
        .collect()
}

struct BatchIndex<'a> {
    stages_by_release: HashMap<i32, HashSet<i32>>,
    environment_names: HashMap<i32, &'a str>,
    steps_by_pair: HashMap<(i32, i32), Vec<&'a Step>>,
}

impl<'a> BatchIndex<'a> {
    fn build(batch: &'a ReleaseBatch) -> Self {
        let mut stages_by_release: HashMap<i32, HashSet<i32>> = HashMap::new();
        for workflow in &batch.stage_workflows {
            stages_by_release
                .entry(workflow.release_id)
                .or_default()
                .insert(workflow.stage_id);
        }

        let mut environment_names = HashMap::with_capacity(batch.environments.len());
        for environment in &batch.environments {
            // First row wins on a duplicated id
            environment_names
                .entry(environment.id)
                .or_insert(environment.name.as_str());
        }

        let mut steps_by_pair: HashMap<(i32, i32), Vec<&Step>> = HashMap::new();
        for step in &batch.steps {
            steps_by_pair
                .entry((step.release_id, step.stage_id))
                .or_default()
                .push(step);
        }

        Self {
            stages_by_release,
            environment_names,
            steps_by_pair,
        }
    }
}

fn assemble_release(
    release: &Release,
    batch: &ReleaseBatch,
    index: &BatchIndex<'_>,
) -> Result<ReleaseNode> {
    let mut linked: Vec<&Stage> = match index.stages_by_release.get(&release.id) {
        Some(stage_ids) => batch
            .stages
            .iter()
            .filter(|stage| stage_ids.contains(&stage.id))
            .collect(),
        None => Vec::new(),
    };
    linked.sort_by_key(|stage| stage.rank);

    let stages = linked
        .into_iter()
        .map(|stage| assemble_stage(release.id, stage, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(ReleaseNode {
        name: release.name.clone(),
        status: release.status.clone(),
        created_on: release.created_on,
        target_stage_id: release.target_stage_id,
        release_path_name: release.release_path_name.clone(),
        stages,
    })
}

fn assemble_stage(release_id: i32, stage: &Stage, index: &BatchIndex<'_>) -> Result<StageNode> {
    let environment = index
        .environment_names
        .get(&stage.environment_id)
        .ok_or_else(|| {
            DashboardError::data_unavailable(format!(
                "stage {} references environment {} which is not in the store",
                stage.id, stage.environment_id
            ))
        })?;

    let mut steps: Vec<&Step> = index
        .steps_by_pair
        .get(&(release_id, stage.id))
        .cloned()
        .unwrap_or_default();
    steps.sort_by_key(|step| (step.attempt, step.step_rank));

    Ok(StageNode {
        id: stage.id,
        name: stage.name.clone(),
        rank: stage.rank,
        environment: (*environment).to_string(),
        steps: steps.into_iter().map(step_node).collect(),
    })
}

fn step_node(step: &Step) -> StepNode {
    StepNode {
        id: step.id,
        name: step.name.clone(),
        status: step.status.clone(),
        rank: step.step_rank,
        created_on: step.created_on,
    }
}
