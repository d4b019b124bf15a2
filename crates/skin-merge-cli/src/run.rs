//! Load, merge, save.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use skin_merge::{MergeReport, MergeRequest, MeshId, SceneDocument, merge};

use crate::cli::Args;

/// Run one merge as described by `args`.
pub fn run(args: &Args) -> Result<MergeReport> {
    let mut scene = load(&args.scene)?;
    let request = request(args, &scene)?;
    let settings = args.settings(scene.settings.clone());

    let mut host = scene
        .to_host()
        .with_context(|| format!("invalid scene {}", args.scene.display()))?;

    let report = merge(&mut host, &request.bases, &request.output, &settings)
        .with_context(|| format!("failed to merge into `{}`", request.output))?;

    scene
        .update_weights(&host)
        .context("failed to read merged weights back")?;
    let destination = args.output.as_deref().unwrap_or(&args.scene);
    save(destination, &scene)?;

    tracing::info!(
        scene = %destination.display(),
        applied = report.applied(),
        failed = report.failures.len(),
        "scene written"
    );

    Ok(report)
}

fn request(args: &Args, scene: &SceneDocument) -> Result<MergeRequest> {
    let from_scene = scene.merge.as_ref();

    let output = match (&args.target, from_scene) {
        (Some(target), _) => MeshId::from(target.as_str()),
        (None, Some(request)) => request.output.clone(),
        (None, None) => bail!("no output mesh: pass --into or add a \"merge\" block to the scene"),
    };

    let bases = if args.bases.is_empty() {
        from_scene.map(|r| r.bases.clone()).unwrap_or_default()
    } else {
        args.bases.iter().map(|b| MeshId::from(b.as_str())).collect()
    };

    Ok(MergeRequest { bases, output })
}

fn load(path: &Path) -> Result<SceneDocument> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn save(path: &Path, scene: &SceneDocument) -> Result<()> {
    let text = serde_json::to_string_pretty(scene)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
