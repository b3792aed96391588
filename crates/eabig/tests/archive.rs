//! End-to-end archive tests against real files on disk

use std::io::{Seek, SeekFrom, Write};

use eabig::{BigArchive, BigVariant, Compression, ContentKind, eahd};
use pretty_assertions::assert_eq;

/// Assemble a BIG4 archive with one sentinel, one EAHD-compressed texture
/// and one plain data blob.
fn build_archive() -> (Vec<u8>, Vec<u8>) {
    let texture: Vec<u8> = {
        let mut t = b"DDS |\x00\x00\x00".to_vec();
        t.extend(std::iter::repeat_n(0xA5u8, 256));
        t
    };
    let compressed = eahd::compress(&texture).unwrap();

    let mut directory = Vec::new();
    let mut push_record = |offset: u32, size: u32, name: &[u8], dir: &mut Vec<u8>| {
        dir.extend_from_slice(&offset.to_be_bytes());
        dir.extend_from_slice(&size.to_be_bytes());
        dir.extend_from_slice(name);
        dir.push(0);
    };

    let tex_offset = 128u32;
    let dat_offset = tex_offset + compressed.len() as u32;
    push_record(0, 0, b"sg1", &mut directory);
    push_record(tex_offset, compressed.len() as u32, b"10", &mut directory);
    push_record(dat_offset, 4, b"meta", &mut directory);

    let mut data = Vec::new();
    data.extend_from_slice(b"BIG4");
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&3u32.to_be_bytes());
    data.extend_from_slice(&(16 + directory.len() as u32).to_be_bytes());
    data.extend_from_slice(&directory);
    data.resize(tex_offset as usize, 0);
    data.extend_from_slice(&compressed);
    data.extend_from_slice(b"\x01\x02\x03\x04");

    (data, texture)
}

#[test]
fn open_archive_from_disk() {
    let (bytes, texture) = build_archive();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let archive = BigArchive::open(file.path()).unwrap();
    assert_eq!(archive.variant(), BigVariant::Big4);
    assert_eq!(archive.len(), 3);
    assert_eq!(archive.payload_names(), vec!["10", "meta"]);

    let tex = archive.get("10").unwrap();
    assert_eq!(tex.kind, ContentKind::Dds);
    assert_eq!(tex.compression, Compression::Eahd);
    assert_eq!(tex.data, texture);
    assert!(
        (tex.raw_size as usize) < texture.len(),
        "stored size is the compressed size"
    );

    let meta = archive.get("meta").unwrap();
    assert_eq!(meta.kind, ContentKind::Dds, "sg1 retag persists past tex");
    assert_eq!(meta.data, b"\x01\x02\x03\x04");
}

#[test]
fn reopen_observes_in_place_overwrite() {
    // external tooling patches entry regions in place; a fresh open must
    // see the new bytes because nothing is cached between parses
    let (bytes, _) = build_archive();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let before = BigArchive::open(file.path()).unwrap();
    let meta = before.get("meta").unwrap();
    assert_eq!(meta.data, b"\x01\x02\x03\x04");
    let offset = meta.offset;

    file.as_file_mut()
        .seek(SeekFrom::Start(u64::from(offset)))
        .unwrap();
    file.as_file_mut().write_all(b"\xAA\xBB\xCC\xDD").unwrap();
    file.as_file_mut().flush().unwrap();

    let after = BigArchive::open(file.path()).unwrap();
    assert_eq!(after.get("meta").unwrap().data, b"\xAA\xBB\xCC\xDD");
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BigArchive::open(dir.path().join("nope.big")).unwrap_err();
    assert!(matches!(err, eabig::Error::Io(_)));
}

#[test]
fn truncated_file_keeps_leading_entries() {
    let (bytes, _) = build_archive();

    // cut inside the compressed texture region, right after the EAHD size
    // header plus a couple of stream bytes: decoding cannot complete
    let cut_at = 128 + 7;
    let cut = &bytes[..cut_at];
    let archive = BigArchive::parse(cut).unwrap();
    assert_eq!(archive.len(), 3);

    // the texture's region was clamped; decoding the partial stream fails
    // and the raw bytes are kept, still EAHD-tagged
    let tex = archive.get("10").unwrap();
    assert_eq!(tex.compression, Compression::Eahd);
    assert_eq!(tex.data, &cut[128..cut_at]);

    // the trailing blob now lies entirely past end-of-file
    assert_eq!(archive.get("meta").unwrap().data, b"");
}
