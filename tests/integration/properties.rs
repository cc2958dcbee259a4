use crate::integration::support::{disk, start, tick, write};
use chrono::Duration;
use vdisk::{Attributes, DiskError, EntryInfo, TimeKind};

#[test]
fn file_create_touches_owning_directory_only() {
    let (disk, clock) = disk();
    disk.create_directory("c:\\outer\\inner").unwrap();

    let later = tick(&clock);
    disk.create_file("c:\\outer\\inner\\a.txt").unwrap();

    let inner = disk.directory("c:\\outer\\inner").unwrap().times().unwrap();
    assert_eq!(inner.creation, start());
    assert_eq!(inner.last_write, later);
    assert_eq!(inner.last_access, later);

    let outer = disk.directory("c:\\outer").unwrap().times().unwrap();
    assert_eq!(outer.last_write, start());
}

#[test]
fn file_delete_touches_owning_directory_only() {
    let (disk, clock) = disk();
    write(&disk, "c:\\outer\\inner\\a.txt", b"a");

    let later = tick(&clock);
    disk.file("c:\\outer\\inner\\a.txt").unwrap().delete().unwrap();

    assert_eq!(
        disk.directory("c:\\outer\\inner").unwrap().last_write_time().unwrap(),
        later
    );
    assert_eq!(
        disk.directory("c:\\outer").unwrap().last_write_time().unwrap(),
        start()
    );
}

#[test]
fn explicit_timestamps_round_trip() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\a.txt").unwrap();
    let dir = disk.directory("c:\\").unwrap();
    let when = start() - Duration::days(30);

    file.set_time(TimeKind::Creation, when).unwrap();
    dir.set_time(TimeKind::LastAccess, when).unwrap();

    assert_eq!(file.creation_time().unwrap(), when);
    assert_eq!(file.last_write_time().unwrap(), start());
    assert_eq!(dir.last_access_time().unwrap(), when);
}

#[test]
fn default_attributes() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\temp\\a.txt").unwrap();
    let dir = disk.directory("c:\\temp").unwrap();

    assert_eq!(file.attributes().unwrap(), Attributes::NORMAL);
    assert_eq!(dir.attributes().unwrap(), Attributes::DIRECTORY);

    dir.set_attributes(Attributes::DIRECTORY | Attributes::HIDDEN)
        .unwrap();
    assert!(dir.attributes().unwrap().contains(Attributes::HIDDEN));
}

#[test]
fn read_only_flag_and_attribute_agree() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\a.txt").unwrap();
    assert!(!file.is_read_only());

    file.set_attributes(Attributes::READ_ONLY | Attributes::ARCHIVE)
        .unwrap();
    assert!(file.is_read_only());

    file.set_read_only(false).unwrap();
    assert_eq!(file.attributes().unwrap(), Attributes::ARCHIVE);
}

#[test]
fn missing_nodes_report_not_found() {
    let (disk, _) = disk();
    disk.create_directory("c:\\temp").unwrap();
    let missing = disk.file("c:\\temp\\ghost.txt").unwrap();
    let orphan = disk.file("c:\\nowhere\\ghost.txt").unwrap();

    assert!(missing.is_read_only());
    assert!(matches!(missing.length(), Err(DiskError::FileNotFound(_))));
    assert!(matches!(missing.attributes(), Err(DiskError::FileNotFound(_))));
    assert!(matches!(missing.times(), Err(DiskError::FileNotFound(_))));
    assert!(matches!(orphan.length(), Err(DiskError::DirectoryNotFound(_))));
    assert!(matches!(
        disk.directory("c:\\nowhere").unwrap().times(),
        Err(DiskError::DirectoryNotFound(_))
    ));
}

#[test]
fn metadata_map_follows_the_file() {
    let (disk, _) = disk();
    disk.create_directory("c:\\dst").unwrap();
    let file = disk.create_file("c:\\src\\a.txt").unwrap();

    assert_eq!(file.set_metadata("owner", "ops").unwrap(), None);
    assert_eq!(
        file.set_metadata("owner", "dev").unwrap(),
        Some("ops".to_string())
    );
    file.set_metadata("tag", "x").unwrap();

    file.move_to("c:\\dst\\a.txt").unwrap();
    let metadata = file.metadata().unwrap();
    assert_eq!(metadata.get("owner").map(String::as_str), Some("dev"));
    assert_eq!(metadata.len(), 2);

    assert_eq!(file.remove_metadata("tag").unwrap(), Some("x".to_string()));
    assert_eq!(file.remove_metadata("tag").unwrap(), None);
}

#[test]
fn names_and_extensions() {
    let (disk, _) = disk();
    let file = disk.create_file("C:\\Temp\\Report.Final.PDF").unwrap();

    assert_eq!(file.name(), "Report.Final.PDF");
    assert_eq!(file.extension(), ".PDF");
    assert_eq!(file.full_name(), "C:\\Temp\\Report.Final.PDF");
    assert_eq!(file.directory().full_name(), "C:\\Temp");

    let temp = file.directory();
    assert_eq!(temp.name(), "Temp");
    assert_eq!(temp.root().full_name(), "C:\\");
    assert!(temp.root().parent().is_none());
    assert_eq!(temp.parent().unwrap().full_name(), "C:\\");
}
