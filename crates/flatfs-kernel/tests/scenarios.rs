//! End-to-end scenarios through the `VfsOps` surface.
//!
//! Each test drives a fresh `FlatBackend` the way the FUSE adapter does:
//! absolute paths in, attributes / listings / bytes out.

use flatfs_kernel::{FlatBackend, Limits, VfsError, VfsOps};

fn names(fs: &FlatBackend, path: &str) -> Vec<String> {
    fs.readdir(path)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

/// mknod + write "hello", shared by several scenarios.
fn hello_file() -> FlatBackend {
    let fs = FlatBackend::default();
    fs.create("/a.txt", 0o644).unwrap();
    assert_eq!(fs.write("/a.txt", 0, b"hello").unwrap(), 5);
    fs
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn mkdir_shows_up_in_root_listing() {
    let fs = FlatBackend::default();
    fs.mkdir("/docs", 0o755).unwrap();

    let listing = names(&fs, "/");
    assert!(listing.contains(&".".to_string()));
    assert!(listing.contains(&"..".to_string()));
    assert!(listing.contains(&"docs".to_string()));
}

#[test]
fn write_then_read_and_size() {
    let fs = hello_file();
    assert_eq!(fs.read("/a.txt", 0, 5).unwrap(), b"hello");
    assert_eq!(fs.getattr("/a.txt").unwrap().size, 5);
}

#[test]
fn append_at_end() {
    let fs = hello_file();
    assert_eq!(fs.write("/a.txt", 5, b" world").unwrap(), 6);
    assert_eq!(fs.read("/a.txt", 0, 11).unwrap(), b"hello world");
    assert_eq!(fs.getattr("/a.txt").unwrap().size, 11);
}

#[test]
fn truncate_over_ceiling_keeps_content() {
    let fs = hello_file();
    assert!(matches!(
        fs.truncate("/a.txt", 2000),
        Err(VfsError::NoSpace(_))
    ));
    assert_eq!(fs.read("/a.txt", 0, 100).unwrap(), b"hello");
    assert_eq!(fs.getattr("/a.txt").unwrap().size, 5);
}

#[test]
fn getattr_missing_is_not_found() {
    let fs = FlatBackend::default();
    assert!(matches!(fs.getattr("/nope"), Err(VfsError::NotFound(_))));
}

#[test]
fn rmdir_leaves_siblings() {
    let fs = FlatBackend::default();
    fs.mkdir("/x", 0o755).unwrap();
    fs.mkdir("/y", 0o755).unwrap();
    fs.rmdir("/x").unwrap();

    let listing = names(&fs, "/");
    assert!(listing.contains(&"y".to_string()));
    assert!(!listing.contains(&"x".to_string()));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn every_created_directory_is_listed() {
    let fs = FlatBackend::default();
    let dirs = ["a", "b c", "ünïcode", "with.dot", "-dash"];
    for d in dirs {
        fs.mkdir(&format!("/{d}"), 0o755).unwrap();
    }
    let listing = names(&fs, "/");
    for d in dirs {
        assert!(listing.contains(&d.to_string()), "{d} missing from {listing:?}");
    }
}

#[test]
fn every_created_file_is_empty_regular_file() {
    let fs = FlatBackend::default();
    for f in ["one", "two.txt", "three.md"] {
        let path = format!("/{f}");
        fs.create(&path, 0o644).unwrap();
        let attr = fs.getattr(&path).unwrap();
        assert!(attr.is_file());
        assert_eq!(attr.size, 0);
    }
}

#[test]
fn truncate_grow_region_reads_as_nothing() {
    let fs = hello_file();
    fs.truncate("/a.txt", 100).unwrap();
    assert!(fs.read("/a.txt", 5, 95).unwrap().is_empty());
    assert_eq!(fs.read("/a.txt", 0, 100).unwrap(), b"hello");
}

#[test]
fn repeated_removals_never_collide() {
    let fs = FlatBackend::default();
    for d in ["a", "b", "c", "d"] {
        fs.mkdir(&format!("/{d}"), 0o755).unwrap();
    }
    fs.rmdir("/a").unwrap();
    fs.rmdir("/c").unwrap();
    assert!(matches!(fs.rmdir("/a"), Err(VfsError::NotFound(_))));

    assert_eq!(names(&fs, "/"), vec![".", "..", "b", "d"]);
    assert!(fs.getattr("/b").unwrap().is_dir());
    assert!(fs.getattr("/d").unwrap().is_dir());
}

#[test]
fn listing_is_idempotent() {
    let fs = FlatBackend::default();
    fs.mkdir("/docs", 0o755).unwrap();
    fs.create("/a.txt", 0o644).unwrap();
    fs.create("/b.txt", 0o644).unwrap();

    let first = fs.readdir("/").unwrap();
    let second = fs.readdir("/").unwrap();
    assert_eq!(first, second);
}

#[test]
fn interior_write_cuts_the_tail() {
    let fs = FlatBackend::default();
    fs.create("/a.txt", 0o644).unwrap();
    fs.write("/a.txt", 0, b"hello world").unwrap();
    fs.write("/a.txt", 0, b"J").unwrap();
    assert_eq!(fs.read_all("/a.txt").unwrap(), b"J");
}

#[test]
fn seeded_mount() {
    let fs = FlatBackend::with_seed(Limits::default(), Some("readme"), Some("hi there")).unwrap();
    assert_eq!(names(&fs, "/"), vec![".", "..", "readme"]);
    assert_eq!(fs.read("/readme", 3, 100).unwrap(), b"there");

    // Re-init drops everything created since
    fs.mkdir("/later", 0o755).unwrap();
    fs.init(None, None).unwrap();
    assert_eq!(names(&fs, "/"), vec![".", ".."]);
}

#[test]
fn shared_across_threads() {
    use std::sync::Arc;

    let fs = Arc::new(FlatBackend::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let fs = Arc::clone(&fs);
            std::thread::spawn(move || {
                let path = format!("/f{i}");
                fs.create(&path, 0o644).unwrap();
                fs.write(&path, 0, format!("data {i}").as_bytes()).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(fs.readdir("/").unwrap().len(), 2 + 8);
    for i in 0..8 {
        assert_eq!(
            fs.read_all(&format!("/f{i}")).unwrap(),
            format!("data {i}").into_bytes()
        );
    }
}
