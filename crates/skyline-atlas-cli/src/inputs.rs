use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tga", "gif"];

/// Decides which files under the input path are fed to the packer.
///
/// Globs match the full path with `/` separators. Excludes win over includes,
/// and an empty include list accepts everything.
pub struct InputFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl InputFilter {
    pub fn new(include: &[String], exclude: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            include: glob_set(include)?,
            exclude: glob_set(exclude)?,
        })
    }

    pub fn accepts(&self, p: &Path) -> bool {
        if !has_image_extension(p) {
            return false;
        }
        let s = p.to_string_lossy().replace('\\', "/");
        let excluded = self.exclude.as_ref().is_some_and(|ex| ex.is_match(&s));
        let included = self.include.as_ref().is_none_or(|inc| inc.is_match(&s));
        included && !excluded
    }

    /// Accepted files under `root` (or `root` itself if it is a file).
    ///
    /// Directory entries are visited in file-name order, so the same tree always
    /// yields the same list and therefore the same enqueue order.
    pub fn gather(&self, root: &Path) -> Vec<PathBuf> {
        let mut list = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skip unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                list.push(entry.into_path());
            }
        }
        list
    }
}

/// `None` for an empty pattern list so that "no includes" means "include all".
fn glob_set(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

fn has_image_extension(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}
