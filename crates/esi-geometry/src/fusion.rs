//! Inverse-center fusion: runs several [`FitModelOnPoints`] variants
//! through the global optimizer and combines their translations by
//! per-component median.

use esi_optimizer::{GoGroup, GoParam, Optimizer, OptimizerResult, ParamKind, SearchMethod, Strategy};

use crate::fit_model::FitModelOnPoints;
use crate::param_kinds::*;
use crate::pset::Pset;

const GO_STEPS: usize = 5;
const GO_SUB_STEPS: usize = 2;
const GO_ZOOM: f64 = 0.75;
const FUSION_ITERATIONS: usize = 30;
const FUSION_REQUESTED_PRECISION: f64 = 1e-4;
/// Solution-point fit variants only pull their weight once the cloud is
/// dense enough to outvote the electrode-derived estimates.
const MIN_SOLUTION_POINTS_FOR_BFS_BFE: usize = 2000;
/// The head-surface fit works on a down-sampled outline; finer detail
/// doesn't change the best-fit ellipsoid.
const HEAD_MODEL_DOWNSAMPLE_POINTS: usize = 707;

fn scale_group(bounding_radii: [f64; 3], anisotropic: bool) -> GoGroup {
    if anisotropic {
        GoGroup::new(vec![
            GoParam::new(SCALE_X, bounding_radii[0] * 0.75, bounding_radii[0] * 1.25, bounding_radii[0], GO_STEPS, GO_SUB_STEPS, GO_ZOOM),
            GoParam::new(SCALE_Y, bounding_radii[1] * 0.75, bounding_radii[1] * 1.25, bounding_radii[1], GO_STEPS, GO_SUB_STEPS, GO_ZOOM),
            GoParam::new(SCALE_Z, bounding_radii[2] * 0.75, bounding_radii[2] * 1.25, bounding_radii[2], GO_STEPS, GO_SUB_STEPS, GO_ZOOM),
        ])
    } else {
        let r = (bounding_radii[0] + bounding_radii[1] + bounding_radii[2]) / 3.0;
        GoGroup::new(vec![GoParam::new(
            SCALE,
            r * 0.75,
            r * 1.25,
            r,
            GO_STEPS,
            GO_SUB_STEPS,
            GO_ZOOM,
        )])
    }
}

fn rotation_x_group() -> GoGroup {
    GoGroup::new(vec![GoParam::new(
        ROTATION_X,
        -15.0,
        15.0,
        0.0,
        GO_STEPS,
        GO_SUB_STEPS,
        GO_ZOOM,
    )])
}

fn translation_yz_group(bounding_radii: [f64; 3], span_fraction: f64) -> GoGroup {
    let by = bounding_radii[1] * span_fraction;
    let bz = bounding_radii[2] * span_fraction;
    GoGroup::new(vec![
        GoParam::new(TRANSLATION_Y, -by, by, 0.0, GO_STEPS, GO_SUB_STEPS, GO_ZOOM),
        GoParam::new(TRANSLATION_Z, -bz, bz, 0.0, GO_STEPS, GO_SUB_STEPS, GO_ZOOM),
    ])
}

fn final_params(groups_spec: &[GoGroup], result: &OptimizerResult) -> Vec<(ParamKind, f64)> {
    let mut snapshot: Vec<(ParamKind, f64)> = Vec::new();
    for (g, values) in groups_spec.iter().zip(&result.groups) {
        for (p, &v) in g.params.iter().zip(values) {
            snapshot.push((p.kind, v));
        }
    }
    snapshot
}

fn fit_variant(points: &Pset, groups: Vec<GoGroup>) -> (FitModelOnPoints, Vec<(ParamKind, f64)>) {
    let model = FitModelOnPoints::new(points.clone());
    let mut optimizer = Optimizer::new(groups.clone(), SearchMethod::BoxScan, Strategy::Cyclical, model);
    let result = optimizer.run(FUSION_ITERATIONS, FUSION_REQUESTED_PRECISION);
    let snapshot = final_params(&groups, &result);
    (FitModelOnPoints::new(points.clone()), snapshot)
}

fn run_variant(points: &Pset, groups: Vec<GoGroup>) -> [f64; 3] {
    let (_, snapshot) = fit_variant(points, groups);
    FitModelOnPoints::translation(&snapshot)
}

fn head_surface_groups(head_points: &Pset) -> (Pset, Vec<GoGroup>) {
    let head = head_points.downsample(HEAD_MODEL_DOWNSAMPLE_POINTS);
    let bb = head.bounding_box();
    let radii = [bb.radius_axis(0), bb.radius_axis(1), bb.radius_axis(2)];
    let groups = vec![
        scale_group(radii, true),
        rotation_x_group(),
        translation_yz_group(radii, 0.05),
    ];
    (head, groups)
}

/// 6-parameter best-fitting ellipsoid of the (down-sampled) head surface:
/// scale x/y/z, rotation about x, translation y/z.
fn fit_bfe_head(head_points: &Pset) -> [f64; 3] {
    let (head, groups) = head_surface_groups(head_points);
    run_variant(&head, groups)
}

/// Fits the same best-fitting ellipsoid [`fit_bfe_head`] uses, but
/// returns the fitted model and its full parameter snapshot instead of
/// just the translation, so the caller can probe local surface radii
/// via [`FitModelOnPoints::surface_radius_towards`] (needed by the
/// LSMAC lead-field assembly).
pub fn fit_head_surface_model(head_points: &Pset) -> (FitModelOnPoints, Vec<(ParamKind, f64)>) {
    let (head, groups) = head_surface_groups(head_points);
    fit_variant(&head, groups)
}

/// 4-parameter best-fitting sphere: uniform scale, translation y/z.
fn fit_bfs(points: &Pset) -> [f64; 3] {
    let bb = points.bounding_box();
    let radii = [bb.radius_axis(0), bb.radius_axis(1), bb.radius_axis(2)];
    let groups = vec![scale_group(radii, false), translation_yz_group(radii, 0.10)];
    run_variant(points, groups)
}

/// 7-parameter best-fitting ellipsoid: scale x/y/z, rotation about x,
/// translation y/z.
fn fit_bfe(points: &Pset) -> [f64; 3] {
    let bb = points.bounding_box();
    let radii = [bb.radius_axis(0), bb.radius_axis(1), bb.radius_axis(2)];
    let groups = vec![
        scale_group(radii, true),
        rotation_x_group(),
        translation_yz_group(radii, 0.10),
    ];
    run_variant(points, groups)
}

fn median_translation(translations: &[[f64; 3]]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (d, out_d) in out.iter_mut().enumerate() {
        let mut axis: Vec<f64> = translations.iter().map(|t| t[d]).collect();
        axis.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let n = axis.len();
        *out_d = if n == 0 {
            0.0
        } else if n % 2 == 0 {
            0.5 * (axis[n / 2 - 1] + axis[n / 2])
        } else {
            axis[n / 2]
        };
    }
    out
}

/// Runs the head-surface, electrode and (when dense enough)
/// solution-point fit variants and returns the per-component median
/// translation: the origin every subsequent point set is re-centered on.
pub fn fuse_inverse_center(
    head_points: Option<&Pset>,
    electrode_points: &Pset,
    solution_points: &Pset,
) -> [f64; 3] {
    let mut translations = Vec::new();

    if let Some(head) = head_points {
        tracing::debug!("fitting best-fitting ellipsoid of head surface");
        translations.push(fit_bfe_head(head));
    }

    tracing::debug!("fitting best-fitting sphere of electrodes");
    translations.push(fit_bfs(electrode_points));
    tracing::debug!("fitting best-fitting ellipsoid of electrodes");
    translations.push(fit_bfe(electrode_points));

    if solution_points.len() >= MIN_SOLUTION_POINTS_FOR_BFS_BFE {
        tracing::debug!("fitting best-fitting sphere of solution points");
        translations.push(fit_bfs(solution_points));
        tracing::debug!("fitting best-fitting ellipsoid of solution points");
        translations.push(fit_bfe(solution_points));
    }

    let fused = median_translation(&translations);
    tracing::info!(?fused, variants = translations.len(), "inverse center fused");
    fused
}
