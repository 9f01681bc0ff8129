/*!
# Integration Tests for Unbom

Directory scans against real files in a temp directory.
*/

use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unbom::encoding::UTF8_BOM;
use unbom::{
    scan, ChardetngDetector, Detection, EncodingDetector, NormalizeError, NormalizeOptions,
    Normalizer, Outcome, RewriteStrategy, RunSummary, ScanError, ScanTarget,
};

const FRENCH: &str = "Le café est très chaud. À côté de la fenêtre, le garçon mange une crème brûlée.\n\
    Déjà vu : la façade naïve de l'hôtel était éclairée.\n";

fn with_bom(text: &str) -> Vec<u8> {
    let mut bytes = UTF8_BOM.to_vec();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

fn latin1(text: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!unmappable);
    bytes.into_owned()
}

/// a.txt: UTF-8 without BOM, b.txt: UTF-8 with BOM, c.txt: Latin-1
fn mixed_directory() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.txt"), "plain ütf-8 text\n").unwrap();
    fs::write(root.join("b.txt"), with_bom("bom prefixed text\n")).unwrap();
    fs::write(
        root.join("c.txt"),
        latin1(FRENCH),
    )
    .unwrap();
    temp_dir
}

fn normalizer(add_bom: bool) -> Normalizer<ChardetngDetector> {
    Normalizer::new(
        ChardetngDetector::new(),
        NormalizeOptions {
            add_bom,
            strategy: RewriteStrategy::Atomic,
        },
    )
}

fn run<D: EncodingDetector>(
    dir: &Path,
    recurse: bool,
    normalizer: &Normalizer<D>,
) -> (RunSummary, Vec<Outcome>) {
    let mut outcomes = Vec::new();
    let summary = scan(
        &ScanTarget::new(dir, "*"),
        recurse,
        normalizer,
        |outcome| outcomes.push(outcome.clone()),
    )
    .unwrap();
    (summary, outcomes)
}

fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .map(|path| {
            let bytes = fs::read(&path).unwrap();
            (path, bytes)
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_mixed_directory_strip_bom() {
    let temp_dir = mixed_directory();
    let root = temp_dir.path();

    let (summary, outcomes) = run(root, false, &normalizer(false));

    assert_eq!(summary.rewritten, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);

    assert!(matches!(outcomes[0], Outcome::Skipped { .. }));
    assert!(outcomes[1].is_rewritten());
    assert!(outcomes[2].is_rewritten());

    assert_eq!(fs::read(root.join("a.txt")).unwrap(), "plain ütf-8 text\n".as_bytes());
    assert_eq!(fs::read(root.join("b.txt")).unwrap(), b"bom prefixed text\n");
    assert_eq!(
        fs::read_to_string(root.join("c.txt")).unwrap(),
        FRENCH
    );
}

#[test]
fn test_mixed_directory_set_bom() {
    let temp_dir = mixed_directory();
    let root = temp_dir.path();

    let (summary, _) = run(root, false, &normalizer(true));

    // b.txt already has a BOM
    assert_eq!(summary.rewritten, 2);
    assert_eq!(summary.skipped, 1);

    for name in ["a.txt", "b.txt", "c.txt"] {
        let bytes = fs::read(root.join(name)).unwrap();
        assert_eq!(&bytes[..3], &UTF8_BOM, "{}", name);
        assert!(!bytes[3..].starts_with(&UTF8_BOM), "{}", name);
    }
}

#[test]
fn test_idempotence() {
    for add_bom in [false, true] {
        let temp_dir = mixed_directory();
        let root = temp_dir.path();
        let normalizer = normalizer(add_bom);

        let (first, _) = run(root, false, &normalizer);
        assert!(first.rewritten > 0);
        let after_first = snapshot(root);

        let (second, _) = run(root, false, &normalizer);
        assert_eq!(second.rewritten, 0, "add_bom={}", add_bom);
        assert_eq!(snapshot(root), after_first);
    }
}

#[test]
fn test_bom_stripped_files_never_start_with_bom() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("double.txt"), with_bom("\u{FEFF}twice")).unwrap();
    fs::write(root.join("only.txt"), UTF8_BOM).unwrap();

    run(root, false, &normalizer(false));

    assert_eq!(fs::read(root.join("double.txt")).unwrap(), b"twice");
    assert_eq!(fs::read(root.join("only.txt")).unwrap(), b"");
}

#[test]
fn test_utf16_is_converted() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "wide text".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(root.join("wide.txt"), bytes).unwrap();

    let (summary, outcomes) = run(root, false, &normalizer(false));

    assert_eq!(summary.rewritten, 1);
    match &outcomes[0] {
        Outcome::Rewritten(report) => {
            assert_eq!(report.encoding.as_deref(), Some("utf-16le"));
            assert_eq!(report.describe(), "utf-16le found");
        }
        other => panic!("expected rewrite, got {other:?}"),
    }
    assert_eq!(fs::read(root.join("wide.txt")).unwrap(), b"wide text");
}

#[test]
fn test_recurse() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("nested").join("deeper")).unwrap();
    fs::write(root.join("top.txt"), with_bom("top")).unwrap();
    fs::write(root.join("nested").join("deeper").join("low.txt"), with_bom("low")).unwrap();

    let (flat, _) = run(root, false, &normalizer(false));
    assert_eq!(flat.rewritten, 1);
    assert!(fs::read(root.join("nested/deeper/low.txt")).unwrap().starts_with(&UTF8_BOM));

    let (deep, _) = run(root, true, &normalizer(false));
    assert_eq!(deep.rewritten, 1);
    assert_eq!(fs::read(root.join("nested/deeper/low.txt")).unwrap(), b"low");
}

#[test]
fn test_pattern_limits_candidates() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("keep.md"), with_bom("md")).unwrap();
    fs::write(root.join("fix.txt"), with_bom("txt")).unwrap();

    let target = ScanTarget::parse(&root.join("*.txt"), None);
    let summary = scan(&target, false, &normalizer(false), |_| {}).unwrap();

    assert_eq!(summary.rewritten, 1);
    assert_eq!(fs::read(root.join("fix.txt")).unwrap(), b"txt");
    assert!(fs::read(root.join("keep.md")).unwrap().starts_with(&UTF8_BOM));
}

#[test]
fn test_swap_strategy_without_backup() {
    let temp_dir = mixed_directory();
    let root = temp_dir.path();
    let normalizer = Normalizer::new(
        ChardetngDetector::new(),
        NormalizeOptions {
            add_bom: false,
            strategy: RewriteStrategy::Swap { keep_backup: false },
        },
    );

    let (summary, _) = run(root, false, &normalizer);

    assert_eq!(summary.rewritten, 2);
    assert_eq!(snapshot(root).len(), 3, "no .bak files left behind");
}

#[test]
fn test_swap_strategy_ignores_backups_on_rerun() {
    let temp_dir = mixed_directory();
    let root = temp_dir.path();
    let normalizer = Normalizer::new(
        ChardetngDetector::new(),
        NormalizeOptions {
            add_bom: false,
            strategy: RewriteStrategy::Swap { keep_backup: true },
        },
    );

    let (first, _) = run(root, false, &normalizer);
    assert_eq!(first.rewritten, 2);
    assert!(root.join("b.txt.bak").exists());
    assert!(root.join("c.txt.bak").exists());

    let (second, _) = run(root, false, &normalizer);
    assert_eq!(second.rewritten, 0);
    assert_eq!(second.total(), 3);
}

/// Fails for one file name, delegates to chardetng otherwise
struct FlakyDetector {
    broken: &'static str,
    calls: Cell<usize>,
}

impl EncodingDetector for FlakyDetector {
    fn detect(&self, path: &Path) -> Result<Detection, NormalizeError> {
        self.calls.set(self.calls.get() + 1);
        if path.file_name() == Some(std::ffi::OsStr::new(self.broken)) {
            return Err(NormalizeError::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
            ));
        }
        ChardetngDetector::new().detect(path)
    }
}

#[test]
fn test_fault_isolation() {
    let temp_dir = mixed_directory();
    let root = temp_dir.path();
    let original_b = fs::read(root.join("b.txt")).unwrap();

    let detector = FlakyDetector {
        broken: "b.txt",
        calls: Cell::new(0),
    };
    let normalizer = Normalizer::new(&detector, NormalizeOptions::default());

    let (summary, outcomes) = run(root, false, &normalizer);

    assert_eq!(detector.calls.get(), 3);
    assert_eq!(
        summary,
        RunSummary {
            rewritten: 1,
            skipped: 1,
            failed: 1
        }
    );
    match &outcomes[1] {
        Outcome::Failed(failure) => {
            assert_eq!(failure.path, root.join("b.txt"));
            assert!(failure.message.contains("Access denied"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(fs::read(root.join("b.txt")).unwrap(), original_b);
}

#[test]
fn test_directory_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist");

    let detector = FlakyDetector {
        broken: "",
        calls: Cell::new(0),
    };
    let normalizer = Normalizer::new(&detector, NormalizeOptions::default());
    let mut reported = 0;

    let result = scan(&ScanTarget::new(&missing, "*"), true, &normalizer, |_| {
        reported += 1
    });

    match result {
        Err(ScanError::DirectoryNotFound(dir)) => assert_eq!(dir, missing),
        other => panic!("expected DirectoryNotFound, got {other:?}"),
    }
    assert_eq!(reported, 0);
    assert_eq!(detector.calls.get(), 0);
}

#[cfg(unix)]
#[test]
fn test_read_only_file_fails_and_stays_untouched() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = mixed_directory();
    let root = temp_dir.path();
    let locked = root.join("b.txt");
    let original = fs::read(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();
    if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
        // root ignores file modes
        return;
    }

    let (summary, outcomes) = run(root, false, &normalizer(false));

    assert_eq!(
        summary,
        RunSummary {
            rewritten: 1,
            skipped: 1,
            failed: 1
        }
    );
    assert!(matches!(&outcomes[1], Outcome::Failed(failure) if failure.path == locked));
    assert_eq!(fs::read(&locked).unwrap(), original);
    assert_eq!(
        fs::metadata(&locked).unwrap().permissions().mode() & 0o777,
        0o444
    );
}

#[test]
fn test_swap_strategy_still_processes_unrelated_bak_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("notes.bak"), with_bom("user notes")).unwrap();
    let normalizer = Normalizer::new(
        ChardetngDetector::new(),
        NormalizeOptions {
            add_bom: false,
            strategy: RewriteStrategy::Swap { keep_backup: false },
        },
    );

    let (summary, _) = run(root, false, &normalizer);

    assert_eq!(summary.rewritten, 1);
    assert_eq!(fs::read(root.join("notes.bak")).unwrap(), b"user notes");
}
