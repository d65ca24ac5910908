use std::collections::BTreeMap;
use std::path::Path;

use fxbuild_core::ConstantMap;

pub fn defines(project_dir: &Path, json: bool) -> anyhow::Result<()> {
    let resolved = super::pipeline::resolve(project_dir)?;
    let map = ConstantMap::materialize(&resolved.env, &resolved.release);

    if json {
        let object: BTreeMap<&str, &str> = map.iter().collect();
        println!("{}", serde_json::to_string_pretty(&object)?);
    } else {
        for (name, literal) in map.iter() {
            println!("{name}={literal}");
        }
    }
    Ok(())
}
