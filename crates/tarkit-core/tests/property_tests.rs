//! Property-based round-trip tests.
//!
//! These generate arbitrary trees and payloads and check that a pack
//! followed by an unpack reproduces them exactly.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use tarkit_core::ArchiveError;
use tarkit_core::ArchiveReader;
use tarkit_core::ArchiveWriter;
use tarkit_core::CompressionCodec;
use tarkit_core::ReaderConfig;
use tarkit_core::WriterConfig;
use tempfile::TempDir;

/// Relative file path -> content.
type Tree = BTreeMap<String, Vec<u8>>;

fn tree_strategy() -> impl Strategy<Value = Tree> {
    prop::collection::btree_map(
        "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        prop::collection::vec(any::<u8>(), 0..2048),
        0..8,
    )
    .prop_filter("a file path cannot also be a directory", |tree| {
        tree.keys().all(|path| {
            tree.keys()
                .all(|other| !other.starts_with(&format!("{path}/")))
        })
    })
}

fn materialize(root: &Path, tree: &Tree) {
    fs::create_dir_all(root).unwrap();
    for (path, content) in tree {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
}

fn collect(root: &Path) -> Tree {
    let mut tree = Tree::new();
    for entry in walkdir_files(root) {
        let relative = entry.strip_prefix(root).unwrap();
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_str().unwrap())
            .collect::<Vec<_>>()
            .join("/");
        tree.insert(name, fs::read(&entry).unwrap());
    }
    tree
}

fn walkdir_files(root: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Packing a tree and unpacking it elsewhere reproduces every file.
    #[test]
    fn prop_tree_round_trip(tree in tree_strategy()) {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        materialize(&source, &tree);

        let mut writer = ArchiveWriter::new(Vec::new());
        writer.add_tree(&source).unwrap();
        let archive = writer.into_inner().unwrap();

        let out = temp.path().join("out");
        ArchiveReader::new(archive.as_slice())
            .extract_all(Some(&out))
            .unwrap();

        prop_assert_eq!(collect(&out.join("src")), tree);
    }

    /// In-memory entries come back byte for byte, in order.
    #[test]
    fn prop_bytes_round_trip(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..4096), 1..6),
        gzip in any::<bool>(),
    ) {
        let codec = gzip.then_some(CompressionCodec::Gzip);
        let config = WriterConfig::default().with_compression(codec);
        let mut writer = ArchiveWriter::with_config(Vec::new(), &config).unwrap();
        for (i, payload) in payloads.iter().enumerate() {
            writer.add_bytes(&format!("entry-{i}"), payload).unwrap();
        }
        let archive = writer.into_inner().unwrap();

        let config = ReaderConfig::default().with_compression(codec);
        let mut reader = ArchiveReader::with_config(archive.as_slice(), &config).unwrap();
        for (i, payload) in payloads.iter().enumerate() {
            let (entry, data) = reader.next_as_bytes().unwrap().unwrap();
            prop_assert_eq!(entry.name, format!("entry-{i}"));
            prop_assert_eq!(&data, payload);
        }
        prop_assert!(reader.next_as_bytes().unwrap().is_none());
    }

    /// Any declared size that differs from the payload length is refused.
    #[test]
    fn prop_size_contract_enforced(
        payload in prop::collection::vec(any::<u8>(), 0..1024),
        declared in 0u64..1200,
    ) {
        prop_assume!(declared != payload.len() as u64);
        let mut writer = ArchiveWriter::new(Vec::new());
        let result = writer.add_reader("file", declared, payload.as_slice());
        let is_size_mismatch = matches!(result, Err(ArchiveError::SizeMismatch { .. }));
        prop_assert!(is_size_mismatch);
        prop_assert!(writer.close().is_err());
    }

    /// Truncating a stream anywhere inside its entries never panics and
    /// never yields a payload of the wrong length.
    #[test]
    fn prop_truncation_detected(cut in 1usize..1536) {
        let mut writer = ArchiveWriter::new(Vec::new());
        writer.add_bytes("a", &[1u8; 700]).unwrap();
        let archive = writer.into_inner().unwrap();
        let truncated = &archive[..cut.min(archive.len())];

        let mut reader = ArchiveReader::new(truncated);
        match reader.next_as_bytes() {
            Ok(Some((entry, data))) => prop_assert_eq!(data.len() as u64, entry.size),
            Ok(None) => prop_assert!(false, "a cut header must not look like end of archive"),
            Err(err) => prop_assert!(err.is_corruption()),
        }
    }
}
