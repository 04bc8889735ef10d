use crate::{
    BuildError, GeneratedModule,
    render::{RenderOptions, render},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Write `module` under `<root>/<module name>/`, creating directories as needed.
/// Returns the written paths in emission order.
pub fn write_module(
    root: &Path,
    module: &GeneratedModule,
    options: RenderOptions,
) -> Result<Vec<PathBuf>, BuildError> {
    let dir = root.join(&module.name);
    fs::create_dir_all(&dir).map_err(|source| BuildError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut written = Vec::with_capacity(module.files.len());
    for file in &module.files {
        let path = dir.join(&file.name);
        let text = render(&file.tokens, options)?;

        fs::write(&path, text).map_err(|source| BuildError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote generated file");

        written.push(path);
    }

    Ok(written)
}
