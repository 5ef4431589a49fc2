use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Dependency;

/// Load the resolved-artifact list handed over by the build system.
///
/// Relative `descriptor` / `archive` paths are resolved against the list
/// file's directory. Order is preserved; it becomes the row order.
pub fn load_dependencies(path: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read dependency list {}", path.display()))?;
    let mut deps: Vec<Dependency> = serde_json::from_str(&content)
        .with_context(|| format!("invalid dependency list {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for dep in &mut deps {
        for file in [&mut dep.descriptor, &mut dep.archive].into_iter().flatten() {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }
    Ok(deps)
}
