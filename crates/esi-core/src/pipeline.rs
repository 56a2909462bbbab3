//! `EsiPipeline`: the single entry point wiring geometry fusion through
//! lead-field assembly, solution-point graph construction, inverse
//! operator builders and the on-disk writer.

use std::path::{Path, PathBuf};

use esi_common::{NullProgress, ProgressReporter};
use esi_geometry::{fit_head_surface_model, fuse_inverse_center, BoundingBox, Pset};
use esi_inverse::{build_operator, build_resolution_matrix, InverseMethod, InverseMethodConfig};
use esi_io::{InverseFileWriter, NameTables};
use esi_leadfield::{build_lead_field, LeadFieldPreset};
use esi_solution_points::{
    adaptive_26_to_18, is_outside_head, reject_single_neighbors, NeighborhoodClass, NeighborhoodGraph,
    ReductionMode, RejectedSet,
};

use crate::context::ExecutionMode;
use crate::error::{PipelineError, Result};

/// Margin (fraction of each axis' half-extent) tolerated when deciding a
/// solution point lies outside the head surface's bounding box.
const OUTSIDE_HEAD_MARGIN: f64 = 0.05;

/// Which resolution-matrix variants to write, and under what name, for
/// every method. A `None` field skips that variant, matching "serialized
/// if the target file name is non-empty".
#[derive(Debug, Clone, Default)]
pub struct ResolutionTargets {
    pub full_suffix: Option<String>,
    pub per_source_suffix: Option<String>,
    pub transposed_suffix: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EsiPipeline {
    pub leadfield_preset: LeadFieldPreset,
    pub methods: Vec<InverseMethodConfig>,
    pub neighborhood_class: NeighborhoodClass,
    pub reduction_mode: Option<ReductionMode>,
    pub mode: ExecutionMode,
    pub resolution_targets: ResolutionTargets,
}

impl Default for EsiPipeline {
    fn default() -> Self {
        Self {
            leadfield_preset: LeadFieldPreset::default(),
            methods: vec![InverseMethodConfig::default()],
            neighborhood_class: NeighborhoodClass::Eighteen,
            reduction_mode: None,
            mode: ExecutionMode::Minimal,
            resolution_targets: ResolutionTargets::default(),
        }
    }
}

/// What the pipeline did, for the caller to inspect or log: how many
/// solution points were rejected, each method's largest regularization
/// eigenvalue, and which files landed on disk.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub rejected_points: RejectedSet,
    pub lambda_max: Vec<(InverseMethod, f64)>,
    pub files_written: Vec<PathBuf>,
}

impl EsiPipeline {
    pub fn run(
        &self,
        electrodes: &Pset,
        solution_points: &Pset,
        head_surface: &Pset,
        output_dir: impl AsRef<Path>,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<PipelineReport> {
        if self.methods.is_empty() {
            return Err(PipelineError::NoMethodsConfigured);
        }
        let progress = progress.unwrap_or(&NullProgress);
        progress.set_range(&[("leadfield", 1), ("inverse", self.methods.len() as u64)]);

        tracing::info!(
            electrodes = electrodes.len(),
            solution_points = solution_points.len(),
            methods = self.methods.len(),
            "starting ESI pipeline run"
        );

        let center = fuse_inverse_center(Some(head_surface), electrodes, solution_points);
        let neg_center = [-center[0], -center[1], -center[2]];
        let electrodes = electrodes.translated(neg_center);
        let solution_points = solution_points.translated(neg_center);
        let head_surface = head_surface.translated(neg_center);

        let (surface_model, fit_params) = fit_head_surface_model(&head_surface);

        let step = solution_points.step();
        let graph = match self.reduction_mode {
            Some(mode) => adaptive_26_to_18(&solution_points, step, mode),
            None => NeighborhoodGraph::for_class(&solution_points, step, self.neighborhood_class),
        };

        let mut rejected = reject_single_neighbors(&graph);
        let head_bounds: BoundingBox = head_surface.bounding_box();
        for (i, p) in solution_points.points().iter().enumerate() {
            if is_outside_head([p.x(), p.y(), p.z()], &head_bounds, OUTSIDE_HEAD_MARGIN) {
                rejected.insert(i);
            }
        }

        tracing::debug!(rejected = rejected.len(), "solution points rejected before lead-field assembly");

        let (k, leadfield_rejected) =
            build_lead_field(&self.leadfield_preset, &electrodes, &solution_points, &surface_model, &fit_params)?;
        for i in leadfield_rejected.iter() {
            rejected.insert(i);
        }
        progress.advance("leadfield", 1);

        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let mut lambda_max = Vec::with_capacity(self.methods.len());
        let mut files_written = Vec::with_capacity(self.methods.len());

        for config in &self.methods {
            if progress.is_cancelled() {
                tracing::info!(method = config.method.name(), "pipeline run cancelled before this method");
                break;
            }

            let built = build_operator(&k, &rejected, &graph, &solution_points, config)?;
            lambda_max.push((config.method, estimate_lambda_max(&built.regularizations, config.method)));

            let path = output_dir.join(format!("{}.is", config.method.name().to_lowercase()));
            write_operator_file(&path, &built, electrodes.len(), solution_points.len(), &rejected)?;
            files_written.push(path);

            if self.mode == ExecutionMode::WithResolution {
                if let Some(first) = built.matrices.first() {
                    let resolution = build_resolution_matrix(first, &k, &solution_points);
                    files_written.extend(write_resolution_files(
                        output_dir,
                        config.method,
                        &resolution,
                        solution_points.len(),
                        &self.resolution_targets,
                    )?);
                }
            }

            progress.advance("inverse", 1);
        }

        tracing::info!(files = files_written.len(), "ESI pipeline run complete");

        Ok(PipelineReport { rejected_points: rejected, lambda_max, files_written })
    }
}

/// Recovers `lambda_max` from the regularization schedule rather than
/// threading it separately out of each builder: `regv[1] = lambda_max /
/// down` for every method (Dale's substitution only touches `regv[0]`),
/// so `lambda_max = regv[1] * down`. Falls back to 0 for a degenerate
/// single-level schedule.
fn estimate_lambda_max(regularizations: &[f64], method: InverseMethod) -> f64 {
    let down = method.regularization_down();
    regularizations.get(1).copied().unwrap_or(0.0) * down
}

fn write_operator_file(
    path: &Path,
    built: &esi_inverse::BuiltOperator,
    numel: usize,
    numsolp: usize,
    rejected: &RejectedSet,
) -> Result<()> {
    let regularizations: Vec<(f64, String)> =
        built.regularizations.iter().enumerate().map(|(i, &r)| (r, format!("Reg {i}"))).collect();

    let mut writer = InverseFileWriter::create(
        path,
        numel,
        numsolp,
        &regularizations,
        false,
        NameTables { electrode_names: &[], solution_point_names: &[] },
    )?;

    let rejected_rows: Vec<usize> = rejected.iter().collect();
    for matrix in &built.matrices {
        writer.write_matrix(matrix, &rejected_rows)?;
    }
    writer.finish()?;
    Ok(())
}

/// Writes the three optional resolution-matrix variants through the same
/// generic stack-of-matrices container `esi-io` uses for inverse
/// operators: `numel` here is simply "columns of this particular
/// variant", not necessarily electrode count.
fn write_resolution_files(
    output_dir: &Path,
    method: InverseMethod,
    resolution: &esi_inverse::ResolutionMatrices,
    numsolp: usize,
    targets: &ResolutionTargets,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let regularizations = vec![(0.0, "Resolution".to_string())];
    let prefix = method.name().to_lowercase();

    if let Some(suffix) = &targets.full_suffix {
        let path = output_dir.join(format!("{prefix}_{suffix}.is"));
        write_single_matrix(&path, &resolution.full, numsolp, false, &regularizations)?;
        written.push(path);
    }
    if let Some(suffix) = &targets.per_source_suffix {
        let path = output_dir.join(format!("{prefix}_{suffix}.is"));
        write_single_matrix(&path, &resolution.per_source, numsolp, true, &regularizations)?;
        written.push(path);
    }
    if let Some(suffix) = &targets.transposed_suffix {
        let path = output_dir.join(format!("{prefix}_{suffix}.is"));
        write_single_matrix(&path, &resolution.transposed, numsolp, true, &regularizations)?;
        written.push(path);
    }
    Ok(written)
}

fn write_single_matrix(
    path: &Path,
    matrix: &ndarray::Array2<f64>,
    numsolp: usize,
    invscal: bool,
    regularizations: &[(f64, String)],
) -> Result<()> {
    let mut writer = InverseFileWriter::create(
        path,
        matrix.ncols(),
        numsolp,
        regularizations,
        invscal,
        NameTables { electrode_names: &[], solution_point_names: &[] },
    )?;
    writer.write_matrix(matrix, &[])?;
    writer.finish()?;
    Ok(())
}
