//! Staging directories and file lifecycle.
//!
//! Images land in a per-gallery [`WorkArea`]; finished artifacts are written
//! to a `.part` sibling and renamed into place.

mod work_area;

pub use work_area::{default_work_parent, WorkArea, SHM_DIR};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.zip` → `a.zip.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("Title.zip"));
        assert_eq!(p.to_string_lossy(), "Title.zip.part");
        let p2 = temp_path(Path::new("/tmp/out/archive.zip"));
        assert_eq!(p2.to_string_lossy(), "/tmp/out/archive.zip.part");
    }
}
