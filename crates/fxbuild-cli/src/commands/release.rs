use std::path::Path;

/// Print the release identifier for the current checkout.
pub fn release(project_dir: &Path) -> anyhow::Result<()> {
    let resolved = super::pipeline::resolve(project_dir)?;
    println!("{}", resolved.release);
    Ok(())
}
