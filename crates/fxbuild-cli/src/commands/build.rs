use fxbuild_exec::Bundler;
use std::path::Path;

/// Run the build pipeline: metadata → release → constants → esbuild → plugins.
pub async fn build(project_dir: &Path, dry_run: bool) -> anyhow::Result<()> {
    let resolved = super::pipeline::resolve(project_dir)?;
    let plan = super::pipeline::plan(&resolved);
    let bundler = Bundler::new(&resolved.project_dir, &resolved.config);

    if dry_run {
        let command: Vec<String> = std::iter::once(bundler.esbuild().display().to_string())
            .chain(plan.esbuild_args())
            .map(|arg| shell_quote(&arg))
            .collect();
        println!("{}", command.join(" "));
        for plugin in &plan.plugins {
            println!("plugin: {} (release {})", plugin.name(), resolved.release);
        }
        return Ok(());
    }

    println!("Building release {}...", resolved.release);
    let outcome = bundler.run(&plan).await?;

    for step in &outcome.steps {
        println!("  {step}");
    }
    println!();
    println!(
        "Built: {}",
        resolved.project_dir.join(&plan.outdir).display()
    );

    Ok(())
}

/// Quote `arg` for a POSIX shell so printed commands can be pasted back.
fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+%".contains(c));
    if plain {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_args_are_left_alone() {
        assert_eq!(shell_quote("--format=esm"), "--format=esm");
        assert_eq!(shell_quote("src/worker.ts"), "src/worker.ts");
    }

    #[test]
    fn define_literals_are_single_quoted() {
        assert_eq!(
            shell_quote("--define:BRANDING_NAME=\"Fx Twitter\""),
            "'--define:BRANDING_NAME=\"Fx Twitter\"'"
        );
    }

    #[test]
    fn embedded_single_quotes_are_escaped() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn empty_arg_is_quoted() {
        assert_eq!(shell_quote(""), "''");
    }
}
