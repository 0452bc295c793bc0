use log::debug;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TileMosaicError};

pub const DEFAULT_PATTERN: &str = "*SR_clip*.tif";

/// Files directly under `dir` whose name matches the glob `pattern`,
/// sorted by path.
pub fn discover<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);
    let mut paths = glob::glob(&full_pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(Ok(path)),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if paths.is_empty() {
        return Err(TileMosaicError::NoMatches {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    paths.sort();
    debug!("{} files match {:?}: {:?}", paths.len(), full_pattern, paths);
    Ok(paths)
}
