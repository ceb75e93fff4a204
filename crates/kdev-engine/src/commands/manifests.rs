//! `generate-manifests`: write the scaffold to `manifests-<app>/`
//!
//! A run without a host removes an `ingress.yaml` left by an earlier run.

use super::CommandOutcome;
use crate::atomic::atomic_write;
use crate::context::EngineContext;
use kdev_core::errors::{KdevError, Result};
use kdev_core::render::{render_scaffold, INGRESS_FILE};
use std::fs;
use std::io::ErrorKind;

/// # Errors
///
/// `Io` if a file cannot be written.
pub fn generate(
    ctx: &EngineContext,
    app: &str,
    namespace: &str,
    host: Option<&str>,
) -> Result<CommandOutcome> {
    let dir = ctx
        .config
        .manifests_root(&ctx.work_dir)
        .join(format!("manifests-{}", app));

    let mut written = Vec::new();
    for file in render_scaffold(app, namespace, host)? {
        let path = dir.join(file.file_name);
        atomic_write(&path, file.body.as_bytes())?;
        tracing::debug!(path = %path.display(), "wrote manifest");
        written.push(path);
    }

    if host.is_none() {
        let stale = dir.join(INGRESS_FILE);
        match fs::remove_file(&stale) {
            Ok(()) => ctx
                .reporter
                .warn(&format!("Removed {} from an earlier run", stale.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(KdevError::io("remove_stale_ingress", e)),
        }
    }

    ctx.reporter.success(&format!(
        "Generated {} manifest(s) in {}",
        written.len(),
        dir.display()
    ));
    ctx.reporter.info(&format!("Apply with: kubectl apply -f {}", dir.display()));
    Ok(CommandOutcome::Generated(written))
}
