//! Tests for staging files.

use crate::catalog::ComponentRole;
use crate::config::Config;
use crate::files::ShpFiles;
use crate::test_support::{create_dataset, path_str};
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_storage_file_is_created_next_to_dataset() {
    let (temp_dir, seed) = create_dataset("roads", &[ComponentRole::Shp]);
    let files = ShpFiles::new(path_str(&seed)).unwrap();

    let staged = files.storage_file(ComponentRole::Dbf).unwrap();
    assert_eq!(staged.role(), ComponentRole::Dbf);
    assert_eq!(staged.path().parent().unwrap(), temp_dir.path());
    assert!(staged.path().exists());

    let name = staged.path().file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("roads-"), "{}", name);
    assert!(name.ends_with(".dbf"), "{}", name);
    assert_eq!(staged.target(), files.get(ComponentRole::Dbf));
    assert_eq!(staged.identifier(), path_str(staged.path()));
}

#[test]
fn test_each_call_creates_a_new_file() {
    let (_temp_dir, seed) = create_dataset("roads", &[ComponentRole::Shp]);
    let files = ShpFiles::new(path_str(&seed)).unwrap();

    let first = files.storage_file(ComponentRole::ShpXml).unwrap();
    let second = files.storage_file(ComponentRole::ShpXml).unwrap();
    assert_ne!(first.path(), second.path());
    assert!(first.path().to_str().unwrap().ends_with(".shp.xml"));
}

#[test]
fn test_storage_file_is_not_locked() {
    let (_temp_dir, seed) = create_dataset("roads", &[ComponentRole::Shp]);
    let files = ShpFiles::new(path_str(&seed)).unwrap();

    let staged = files.storage_file(ComponentRole::Shp).unwrap();
    assert_eq!(files.lock_count(), 0);
    assert!(!files.is_locked());

    // Outlives the set that created it.
    drop(files);
    let mut file = staged.open_write().unwrap();
    file.write_all(b"replacement").unwrap();
    drop(file);
    assert_eq!(std::fs::read(staged.path()).unwrap(), b"replacement");
}

#[test]
fn test_delete_removes_storage_file() {
    let (_temp_dir, seed) = create_dataset("roads", &[ComponentRole::Shp]);
    let files = ShpFiles::new(path_str(&seed)).unwrap();

    let staged = files.storage_file(ComponentRole::Shx).unwrap();
    let path = staged.path().to_path_buf();
    staged.delete().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_configured_staging_dir() {
    let staging = TempDir::new().unwrap();
    let config = Config {
        staging_dir: Some(staging.path().to_path_buf()),
        ..Config::default()
    };
    let files = ShpFiles::with_config("https://example.com/maps/lakes.shp", config).unwrap();

    let staged = files.storage_file(ComponentRole::Prj).unwrap();
    assert_eq!(staged.path().parent().unwrap(), staging.path());
    assert!(
        staged
            .path()
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("lakes-")
    );
    assert_eq!(staged.target(), "https://example.com/maps/lakes.prj");
}

#[test]
fn test_remote_set_stages_in_temp_dir() {
    let files = ShpFiles::new("https://example.com/maps/lakes.shp").unwrap();
    let staged = files.storage_file(ComponentRole::Dbf).unwrap();

    assert!(staged.path().starts_with(std::env::temp_dir()));
    staged.delete().unwrap();
}

#[test]
fn test_missing_staging_dir_is_io_error() {
    let config = Config {
        staging_dir: Some("/definitely/not/a/dir".into()),
        ..Config::default()
    };
    let files = ShpFiles::with_config("/data/roads.shp", config).unwrap();
    assert!(matches!(
        files.storage_file(ComponentRole::Shp),
        Err(crate::error::ShpFilesError::Io { .. })
    ));
}
