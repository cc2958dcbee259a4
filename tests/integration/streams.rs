use crate::integration::support::{disk, start, tick, write};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use vdisk::stream::MAX_STREAM_LEN;
use vdisk::{DiskError, EntryInfo, FileAccess, FileShare, OpenMode};

#[test]
fn written_bytes_survive_reopen() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\data.bin").unwrap();

    let mut stream = file.open_write().unwrap();
    stream.write_all(&[1, 2, 3, 4]).unwrap();
    stream.close().unwrap();

    let mut stream = file.open_read().unwrap();
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 4]);
    assert_eq!(file.length().unwrap(), 4);
}

#[test]
fn writes_are_private_until_release() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\data.bin").unwrap();

    let mut stream = file.open_write().unwrap();
    stream.write_all(b"pending").unwrap();
    assert_eq!(file.length().unwrap(), 0);
    drop(stream);
    assert_eq!(file.length().unwrap(), 7);
}

#[test]
fn append_positions_at_end() {
    let (disk, _) = disk();
    write(&disk, "c:\\log.txt", b"ab");
    let file = disk.file("c:\\log.txt").unwrap();

    let mut stream = file.append().unwrap();
    assert_eq!(stream.position(), 2);
    stream.write_all(b"cd").unwrap();
    drop(stream);

    assert_eq!(file.read_all().unwrap(), b"abcd");
}

#[test]
fn append_creates_missing_file() {
    let (disk, _) = disk();
    disk.create_directory("c:\\logs").unwrap();
    let file = disk.file("c:\\logs\\new.log").unwrap();

    let mut stream = file.append().unwrap();
    stream.write_all(b"x").unwrap();
    drop(stream);

    assert_eq!(file.read_all().unwrap(), b"x");
}

#[test]
fn create_and_truncate_reset_content() {
    let (disk, _) = disk();
    write(&disk, "c:\\a.txt", b"hello");
    let file = disk.file("c:\\a.txt").unwrap();

    let mut stream = file.create().unwrap();
    assert_eq!(stream.len(), 0);
    stream.write_all(b"x").unwrap();
    drop(stream);
    assert_eq!(file.read_all().unwrap(), b"x");

    let stream = file
        .open(OpenMode::Truncate, FileAccess::Write, FileShare::None)
        .unwrap();
    assert_eq!(file.length().unwrap(), 0);
    drop(stream);
    assert_eq!(file.read_all().unwrap(), b"");
}

#[test]
fn seek_and_overwrite_in_place() {
    let (disk, _) = disk();
    write(&disk, "c:\\a.bin", &[1, 2, 3, 4]);
    let file = disk.file("c:\\a.bin").unwrap();

    let mut stream = file
        .open(OpenMode::Open, FileAccess::ReadWrite, FileShare::None)
        .unwrap();
    stream.seek(SeekFrom::Start(1)).unwrap();
    stream.write_all(&[9]).unwrap();
    stream.seek(SeekFrom::Start(0)).unwrap();
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, vec![1, 9, 3, 4]);
    drop(stream);

    assert_eq!(file.read_all().unwrap(), vec![1, 9, 3, 4]);
}

#[test]
fn set_len_truncates_and_extends() {
    let (disk, _) = disk();
    write(&disk, "c:\\a.bin", &[1, 2, 3, 4]);
    let file = disk.file("c:\\a.bin").unwrap();

    let mut stream = file.open_write().unwrap();
    stream.set_len(2).unwrap();
    drop(stream);
    assert_eq!(file.read_all().unwrap(), vec![1, 2]);

    let mut stream = file.open_write().unwrap();
    stream.set_len(4).unwrap();
    drop(stream);
    assert_eq!(file.read_all().unwrap(), vec![1, 2, 0, 0]);
}

#[test]
fn oversized_lengths_and_far_writes_are_rejected() {
    let (disk, _) = disk();
    write(&disk, "c:\\a.bin", &[1, 2, 3]);
    let file = disk.file("c:\\a.bin").unwrap();

    let mut stream = file.open_write().unwrap();
    assert_eq!(stream.set_len(u64::MAX).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(
        stream.set_len(MAX_STREAM_LEN + 1).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    stream.seek(SeekFrom::Start(u64::MAX / 2)).unwrap();
    assert_eq!(stream.write(&[9]).unwrap_err().kind(), ErrorKind::InvalidInput);

    stream.seek(SeekFrom::Start(MAX_STREAM_LEN)).unwrap();
    assert_eq!(stream.write(&[9]).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(stream.len(), 3);
    assert!(!stream.is_modified());
    drop(stream);

    assert_eq!(file.read_all().unwrap(), vec![1, 2, 3]);
}

#[test]
fn access_mode_is_enforced_on_the_stream() {
    let (disk, _) = disk();
    write(&disk, "c:\\a.txt", b"abc");
    let file = disk.file("c:\\a.txt").unwrap();

    let mut reader = file.open_read().unwrap();
    assert_eq!(reader.write(b"x").unwrap_err().kind(), ErrorKind::PermissionDenied);
    assert_eq!(reader.set_len(0).unwrap_err().kind(), ErrorKind::PermissionDenied);
    drop(reader);

    let mut writer = file.open_write().unwrap();
    let mut buf = [0u8; 3];
    assert_eq!(writer.read(&mut buf).unwrap_err().kind(), ErrorKind::PermissionDenied);
    drop(writer);

    assert_eq!(file.read_all().unwrap(), b"abc");
}

#[test]
fn incompatible_mode_and_access_are_rejected() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\a.txt").unwrap();

    for access in [FileAccess::Read, FileAccess::ReadWrite] {
        let err = file.open(OpenMode::Append, access, FileShare::None).unwrap_err();
        assert!(matches!(err, DiskError::InvalidArgument(_)));
    }
    for mode in [OpenMode::Create, OpenMode::CreateNew, OpenMode::Truncate] {
        let err = file.open(mode, FileAccess::Read, FileShare::None).unwrap_err();
        assert!(matches!(err, DiskError::InvalidArgument(_)));
    }
}

#[test]
fn read_session_leaves_timestamps_alone() {
    let (disk, clock) = disk();
    write(&disk, "c:\\a.txt", b"abc");
    let file = disk.file("c:\\a.txt").unwrap();

    tick(&clock);
    file.read_all().unwrap();

    let times = file.times().unwrap();
    assert_eq!(times.last_write, start());
    assert_eq!(times.last_access, start());
}

#[test]
fn release_after_mutation_refreshes_write_and_access() {
    let (disk, clock) = disk();
    write(&disk, "c:\\a.txt", b"abc");
    let file = disk.file("c:\\a.txt").unwrap();

    let later = tick(&clock);
    let mut stream = file.open_write().unwrap();
    stream.write_all(b"z").unwrap();

    stream.flush().unwrap();
    assert_eq!(file.read_all().unwrap(), b"zbc");
    assert_eq!(file.last_write_time().unwrap(), start());

    stream.close().unwrap();
    let times = file.times().unwrap();
    assert_eq!(times.creation, start());
    assert_eq!(times.last_write, later);
    assert_eq!(times.last_access, later);
}

#[test]
fn close_reports_vanished_file() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\a.txt").unwrap();

    let mut stream = file.open_write().unwrap();
    stream.write_all(b"lost").unwrap();
    file.delete().unwrap();

    let err = stream.close().unwrap_err();
    assert!(matches!(err, DiskError::FileNotFound(_)));
    assert!(!file.exists());
}

#[test]
fn stream_records_share_and_access() {
    let (disk, _) = disk();
    let file = disk.create_file("c:\\a.txt").unwrap();
    let stream = file
        .open(OpenMode::Open, FileAccess::ReadWrite, FileShare::ReadWrite)
        .unwrap();

    assert_eq!(stream.share(), FileShare::ReadWrite);
    assert!(stream.can_read() && stream.can_write());
    assert!(!stream.is_modified());
    assert_eq!(stream.id(), &file.id());
}
