use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// On-disk Eagle library rooted in a temp dir.
pub struct LibraryFixture {
    root: PathBuf,
}

impl LibraryFixture {
    pub fn new(parent: &Path) -> Self {
        let root = parent.join("Test.library");
        fs::create_dir_all(root.join("images")).unwrap();
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folder(&self, folder_id: &str) -> PathBuf {
        let dir = self.root.join("images").join(folder_id);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Folder with `metadata.json`, one asset and its thumbnail.
    pub fn add_item(&self, folder_id: &str, asset: &str, metadata: Value) -> PathBuf {
        let dir = self.folder(folder_id);
        fs::write(dir.join(asset), b"data").unwrap();
        let stem = asset.rsplit_once('.').map(|(s, _)| s).unwrap_or(asset);
        fs::write(dir.join(format!("{}_thumbnail.png", stem)), b"thumb").unwrap();
        fs::write(
            dir.join("metadata.json"),
            serde_json::to_vec(&metadata).unwrap(),
        )
        .unwrap();
        dir
    }
}

pub fn metadata(id: &str, name: &str, ext: &str, tags: &[&str], deleted: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "size": 4,
        "btime": 1_700_000_000_000i64,
        "mtime": 1_700_000_000_000i64,
        "ext": ext,
        "tags": tags,
        "folders": [],
        "isDeleted": deleted,
        "url": "",
        "annotation": "",
        "modificationTime": 1_700_000_000_000i64,
        "width": 10,
        "height": 10,
        "palettes": []
    })
}

/// The canonical three-folder library: one deleted, one missing metadata, one valid and tagged.
pub fn three_folder_library(parent: &Path) -> LibraryFixture {
    let lib = LibraryFixture::new(parent);
    lib.add_item("A.info", "a.jpg", metadata("A", "a", "jpg", &[], true));
    let b = lib.folder("B.info");
    fs::write(b.join("b.jpg"), b"data").unwrap();
    lib.add_item("C.info", "c.jpg", metadata("C", "c", "jpg", &["x"], false));
    lib
}
