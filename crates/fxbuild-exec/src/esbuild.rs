use std::path::Path;

use fxbuild_bundle::BundlePlan;

use crate::error::ExecError;
use crate::executor::CommandExecutor;

/// Run one esbuild pass, streaming its diagnostics to the terminal.
pub async fn run_esbuild<E: CommandExecutor>(
    executor: &E,
    esbuild: &Path,
    plan: &BundlePlan,
) -> Result<(), ExecError> {
    let args = plan.esbuild_args();
    tracing::info!(
        entry_point = %plan.entry_point.display(),
        outdir = %plan.outdir.display(),
        defines = plan.defines.len(),
        "running esbuild"
    );
    executor.exec_streaming(esbuild, &args, &[]).await
}
