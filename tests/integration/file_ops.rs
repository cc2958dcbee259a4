use crate::integration::support::{disk, driver};
use vdisk::{DiskError, EntryInfo, FileAccess, FileShare, OpenMode};

#[test]
fn create_file_materializes_missing_ancestors() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\temp\\folder\\file.txt").unwrap();

    assert!(file.exists());
    assert!(disk.directory("c:\\temp").unwrap().exists());
    assert!(disk.directory("c:\\temp\\folder").unwrap().exists());
    assert_eq!(driver(&disk).directory_count(), 3);
    assert_eq!(driver(&disk).file_count(), 1);
    driver(&disk).verify().unwrap();
}

#[test]
fn create_or_get_file_returns_same_handle() {
    let (disk, _) = disk();
    let first = disk.create_file("c:\\a\\b.txt").unwrap();
    first.write_all(b"keep").unwrap();
    let second = disk.create_file("C:\\A\\B.TXT").unwrap();

    assert_eq!(first, second);
    assert_eq!(second.read_all().unwrap(), b"keep");
    assert_eq!(driver(&disk).file_count(), 1);
}

#[test]
fn create_file_where_directory_exists_conflicts() {
    let (disk, _) = disk();
    disk.create_directory("c:\\temp\\thing").unwrap();

    let err = disk.create_file("c:\\temp\\thing").unwrap_err();
    assert!(matches!(err, DiskError::AlreadyExists(_)));
}

#[test]
fn create_directory_where_file_exists_conflicts() {
    let (disk, _) = disk();
    disk.create_file("c:\\temp\\thing").unwrap();

    let err = disk.create_directory("c:\\temp\\thing").unwrap_err();
    assert!(matches!(err, DiskError::AlreadyExists(_)));

    let err = disk.create_directory("c:\\temp\\thing\\below").unwrap_err();
    assert!(matches!(err, DiskError::AlreadyExists(_)));
    driver(&disk).verify().unwrap();
}

#[test]
fn delete_missing_file_is_noop() {
    let (disk, _) = disk();
    disk.create_directory("c:\\temp").unwrap();
    disk.file("c:\\temp\\ghost.txt").unwrap().delete().unwrap();
}

#[test]
fn delete_file_in_missing_directory_fails() {
    let (disk, _) = disk();
    let err = disk.file("c:\\nowhere\\ghost.txt").unwrap().delete().unwrap_err();
    assert!(matches!(err, DiskError::DirectoryNotFound(_)));
}

#[test]
fn delete_file_naming_directory_is_unauthorized() {
    let (disk, _) = disk();
    disk.create_directory("c:\\temp\\sub").unwrap();

    let err = disk.file("c:\\temp\\sub").unwrap().delete().unwrap_err();
    assert!(matches!(err, DiskError::Unauthorized(_)));
    assert!(disk.directory("c:\\temp\\sub").unwrap().exists());
}

#[test]
fn delete_file_unlinks_it() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\temp\\a.txt").unwrap();
    file.delete().unwrap();

    assert!(!file.exists());
    assert!(disk.directory("c:\\temp").unwrap().delete(false).is_ok());
    driver(&disk).verify().unwrap();
}

#[test]
fn open_state_machine_errors() {
    let (disk, _) = disk();
    let existing = disk.create_file("c:\\temp\\a.txt").unwrap();

    let err = existing
        .open(OpenMode::CreateNew, FileAccess::Write, FileShare::None)
        .unwrap_err();
    assert!(matches!(err, DiskError::AlreadyExists(_)));

    let missing = disk.file("c:\\temp\\b.txt").unwrap();
    let err = missing.open_read().unwrap_err();
    assert!(matches!(err, DiskError::FileNotFound(_)));
    let err = missing
        .open(OpenMode::Truncate, FileAccess::Write, FileShare::None)
        .unwrap_err();
    assert!(matches!(err, DiskError::FileNotFound(_)));

    let orphan = disk.file("c:\\absent\\c.txt").unwrap();
    let err = orphan.open_write().unwrap_err();
    assert!(matches!(err, DiskError::DirectoryNotFound(_)));

    let dir_as_file = disk.file("c:\\temp").unwrap();
    let err = dir_as_file.open_read().unwrap_err();
    assert!(matches!(err, DiskError::Unauthorized(_)));
}

#[test]
fn open_or_create_registers_new_file() {
    let (disk, _) = disk();
    disk.create_directory("c:\\temp").unwrap();
    let file = disk.file("c:\\temp\\new.txt").unwrap();
    assert!(!file.exists());

    drop(file.open_write().unwrap());

    assert!(file.exists());
    let listed = disk
        .directory("c:\\temp")
        .unwrap()
        .files("*", Default::default())
        .unwrap();
    assert_eq!(listed, vec![file]);
}

#[test]
fn invalid_paths_are_argument_errors() {
    let (disk, _) = disk();
    for bad in ["", "c:\\a|b", "c:\\what?", "\\\\server", "c:\\a\\b:c"] {
        let err = disk.file(bad).unwrap_err();
        assert!(matches!(err, DiskError::InvalidArgument(_)), "{bad:?} gave {err:?}");
    }
}
