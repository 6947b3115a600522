// ABOUTME: Filesystem-backed Measure implementation.
// ABOUTME: Recursive std walk for sizes and counts, fs2 for free space.

use super::Measure;
use std::io;
use std::path::Path;

/// Measures real directories and filesystems.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMeasure;

impl Measure for FsMeasure {
    fn directory_size(&self, path: &Path) -> io::Result<u64> {
        let mut total = 0u64;
        walk(path, &mut |meta| total += meta.len())?;
        Ok(total)
    }

    fn file_count(&self, path: &Path) -> io::Result<u64> {
        let mut count = 0u64;
        walk(path, &mut |_| count += 1)?;
        Ok(count)
    }

    fn free_space(&self, path: &Path) -> io::Result<u64> {
        fs2::available_space(path)
    }
}

/// Visit the metadata of every regular file under `path`.
///
/// Symlinks are not followed; a cycle through links would otherwise make
/// the walk unbounded.
fn walk(path: &Path, visit: &mut dyn FnMut(&std::fs::Metadata)) -> io::Result<()> {
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_dir() {
            walk(&entry.path(), visit)?;
        } else if meta.is_file() {
            visit(&meta);
        }
    }
    Ok(())
}
