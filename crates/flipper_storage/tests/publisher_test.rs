//! Tests for strategy selection and callback hand-off.

use flipper_core::{Locator, MediaCategory};
use flipper_error::{
    FlipperError, FlipperErrorKind, PublishError, PublishErrorKind, StorageError,
    StorageErrorKind, StorageResult,
};
use flipper_storage::{
    CapabilityProbe, LegacyStorage, ManagedStore, MediaPublisher, MediaRecord, MediaStream,
    MountState, StaticCapability, StorageHost, StrategyKind,
};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingStore {
    refuse_insert: bool,
    fail_insert: bool,
    no_stream: bool,
    fail_open: bool,
    inserts: Mutex<Vec<(MediaCategory, MediaRecord)>>,
    opens: AtomicUsize,
    removed: Mutex<Vec<Locator>>,
    written: SharedBuffer,
}

impl RecordingStore {
    fn insert_count(&self) -> usize {
        self.inserts.lock().unwrap().len()
    }
}

impl ManagedStore for RecordingStore {
    fn insert(
        &self,
        category: MediaCategory,
        record: &MediaRecord,
    ) -> StorageResult<Option<Locator>> {
        let mut inserts = self.inserts.lock().unwrap();
        inserts.push((category, record.clone()));
        if self.fail_insert {
            return Err(StorageError::new(StorageErrorKind::Unavailable(
                "store offline".to_string(),
            )));
        }
        if self.refuse_insert {
            return Ok(None);
        }
        Ok(Some(Locator::content(
            "test",
            category.collection(),
            inserts.len() as u64,
        )))
    }

    fn open_for_write(&self, locator: &Locator) -> StorageResult<Option<MediaStream>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(StorageError::new(StorageErrorKind::NotFound(
                locator.to_string(),
            )));
        }
        if self.no_stream {
            return Ok(None);
        }
        Ok(Some(Box::new(self.written.clone())))
    }

    fn remove(&self, locator: &Locator) -> StorageResult<()> {
        self.removed.lock().unwrap().push(locator.clone());
        Ok(())
    }
}

struct RecordingLegacy {
    base: PathBuf,
    state: MountState,
    fail_create_dir: bool,
    calls: AtomicUsize,
}

impl RecordingLegacy {
    fn new(base: &Path, state: MountState) -> Self {
        Self {
            base: base.to_path_buf(),
            state,
            fail_create_dir: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LegacyStorage for RecordingLegacy {
    fn category_root(&self, root: &str) -> PathBuf {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.base.join(root)
    }

    fn mount_state(&self, _directory: &Path) -> MountState {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.state
    }

    fn create_dir(&self, directory: &Path) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_dir {
            return Err(StorageError::new(StorageErrorKind::DirectoryCreation(
                directory.display().to_string(),
            )));
        }
        std::fs::create_dir_all(directory).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(e.to_string()))
        })
    }

    fn open_for_write(&self, path: &Path) -> StorageResult<MediaStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let file = std::fs::File::create(path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Box::new(file))
    }
}

/// Capability that can be flipped between calls.
struct ToggleCapability(AtomicBool);

impl CapabilityProbe for ToggleCapability {
    fn has_managed_store(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
enum TestError {
    Publish(PublishError),
    Io(std::io::Error),
    Callback(&'static str),
}

impl From<PublishError> for TestError {
    fn from(err: PublishError) -> Self {
        TestError::Publish(err)
    }
}

impl From<std::io::Error> for TestError {
    fn from(err: std::io::Error) -> Self {
        TestError::Io(err)
    }
}

fn publish_kind(err: TestError) -> PublishErrorKind {
    match err {
        TestError::Publish(e) => e.kind().clone(),
        other => panic!("expected publish error, got {other:?}"),
    }
}

type Calls = Rc<RefCell<Vec<Locator>>>;

fn host(
    managed: bool,
    store: &Arc<RecordingStore>,
    legacy: &Arc<RecordingLegacy>,
) -> StorageHost {
    StorageHost::new(
        Arc::new(StaticCapability::new(managed)),
        store.clone(),
        legacy.clone(),
    )
}

fn publisher(
    host: StorageHost,
    calls: &Calls,
) -> MediaPublisher<impl FnMut(MediaStream, Locator) -> Result<(), TestError>> {
    let calls = calls.clone();
    MediaPublisher::new(
        host,
        "Pictures",
        move |mut stream: MediaStream, locator: Locator| -> Result<(), TestError> {
            stream.write_all(b"pixels")?;
            calls.borrow_mut().push(locator);
            Ok(())
        },
    )
}

#[test]
fn managed_strategy_never_touches_legacy_storage() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(true, &store, &legacy), &calls).with_sub_folder("Screenshots");
    assert_eq!(publisher.strategy(), StrategyKind::ManagedStore);

    let locator = publisher
        .publish(MediaCategory::Image, "capture", "image/png")
        .unwrap();

    assert_eq!(legacy.call_count(), 0);
    assert_eq!(store.insert_count(), 1);
    assert_eq!(store.opens.load(Ordering::SeqCst), 1);
    assert_eq!(store.written.contents(), b"pixels");
    assert_eq!(*calls.borrow(), vec![locator.clone()]);
    assert_eq!(locator.as_str(), "content://media/test/images/media/1");

    let inserts = store.inserts.lock().unwrap();
    let (category, record) = &inserts[0];
    assert_eq!(*category, MediaCategory::Image);
    assert_eq!(
        record,
        &MediaRecord {
            display_name: "capture".to_string(),
            mime_type: "image/png".to_string(),
            relative_path: "Pictures/Screenshots".to_string(),
            owner: "flipper".to_string(),
        }
    );
}

#[test]
fn direct_strategy_never_inserts() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(false, &store, &legacy), &calls).with_sub_folder("Screenshots");
    assert_eq!(publisher.strategy(), StrategyKind::DirectPath);

    let locator = publisher.publish_image("capture", "image/png").unwrap();

    let expected = temp_dir.path().join("Pictures/Screenshots/capture.png");
    assert_eq!(store.insert_count(), 0);
    assert_eq!(store.opens.load(Ordering::SeqCst), 0);
    assert_eq!(locator, Locator::from_file_path(&expected));
    assert_eq!(locator.to_file_path().unwrap(), expected);
    assert_eq!(*calls.borrow(), vec![locator]);
    assert_eq!(std::fs::read(&expected).unwrap(), b"pixels");
}

#[test]
fn direct_strategy_without_extension_has_no_trailing_dot() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(false, &store, &legacy), &calls);
    let locator = publisher
        .publish(MediaCategory::Image, "raw", "application/x-flipper-unknown")
        .unwrap();

    assert_eq!(
        locator.to_file_path().unwrap(),
        temp_dir.path().join("Pictures/raw")
    );
}

#[test]
fn read_only_legacy_storage_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let calls = Calls::default();

    for state in [MountState::MountedReadOnly, MountState::Unavailable] {
        let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), state));
        let mut publisher = publisher(host(false, &store, &legacy), &calls);

        let err = publisher
            .publish(MediaCategory::Video, "clip", "video/mp4")
            .unwrap_err();
        assert!(matches!(
            publish_kind(err),
            PublishErrorKind::StorageUnavailable(_)
        ));
    }

    assert!(calls.borrow().is_empty());
    assert!(!temp_dir.path().join("Pictures").exists());
}

#[test]
fn refused_insert_is_create_failed() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore {
        refuse_insert: true,
        ..Default::default()
    });
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(true, &store, &legacy), &calls);
    let err = publisher
        .publish(MediaCategory::Audio, "theme", "audio/mpeg")
        .unwrap_err();

    assert!(matches!(publish_kind(err), PublishErrorKind::CreateFailed(_)));
    assert!(calls.borrow().is_empty());
    assert_eq!(store.opens.load(Ordering::SeqCst), 0);
}

#[test]
fn failing_insert_is_create_failed() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore {
        fail_insert: true,
        ..Default::default()
    });
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(true, &store, &legacy), &calls);
    let err = publisher
        .publish(MediaCategory::Audio, "theme", "audio/mpeg")
        .unwrap_err();

    assert!(matches!(publish_kind(err), PublishErrorKind::CreateFailed(_)));
    assert!(calls.borrow().is_empty());
}

#[test]
fn open_failure_leaves_entry_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    for store in [
        RecordingStore {
            no_stream: true,
            ..Default::default()
        },
        RecordingStore {
            fail_open: true,
            ..Default::default()
        },
    ] {
        let store = Arc::new(store);
        let mut publisher = publisher(host(true, &store, &legacy), &calls);
        let err = publisher
            .publish(MediaCategory::Image, "capture", "image/png")
            .unwrap_err();

        assert!(matches!(publish_kind(err), PublishErrorKind::OpenFailed(_)));
        assert_eq!(store.insert_count(), 1);
        assert!(store.removed.lock().unwrap().is_empty());
    }

    assert!(calls.borrow().is_empty());
}

#[test]
fn open_failure_removes_entry_when_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore {
        no_stream: true,
        ..Default::default()
    });
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(true, &store, &legacy), &calls).with_orphan_removal(true);
    let err = publisher
        .publish(MediaCategory::Image, "capture", "image/png")
        .unwrap_err();

    assert!(matches!(publish_kind(err), PublishErrorKind::OpenFailed(_)));
    assert_eq!(
        *store.removed.lock().unwrap(),
        vec![Locator::content("test", "images", 1)]
    );
    assert!(calls.borrow().is_empty());
}

#[test]
fn empty_arguments_are_rejected_before_any_storage_call() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    for managed in [true, false] {
        let mut publisher = publisher(host(managed, &store, &legacy), &calls);
        for (name, mime) in [("", "image/png"), ("capture", "")] {
            let err = publisher
                .publish(MediaCategory::Image, name, mime)
                .unwrap_err();
            assert!(matches!(
                publish_kind(err),
                PublishErrorKind::InvalidArgument(_)
            ));
        }
    }

    assert_eq!(store.insert_count(), 0);
    assert_eq!(legacy.call_count(), 0);
    assert!(calls.borrow().is_empty());
}

#[test]
fn escaping_names_are_rejected_before_any_storage_call() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("storage");
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(&base, MountState::Mounted));
    let calls = Calls::default();

    for managed in [true, false] {
        let mut escaping =
            publisher(host(managed, &store, &legacy), &calls).with_sub_folder("../../outside");
        let err = escaping.publish_image("x", "image/png").unwrap_err();
        assert!(matches!(
            publish_kind(err),
            PublishErrorKind::InvalidArgument(_)
        ));

        let mut publisher = publisher(host(managed, &store, &legacy), &calls);
        for name in ["../x", "a/b", "..", "."] {
            let err = publisher.publish_image(name, "image/png").unwrap_err();
            assert!(
                matches!(publish_kind(err), PublishErrorKind::InvalidArgument(_)),
                "{name}"
            );
        }
    }

    assert_eq!(store.insert_count(), 0);
    assert_eq!(legacy.call_count(), 0);
    assert!(calls.borrow().is_empty());
    assert!(!temp_dir.path().join("outside").exists());
    assert!(!temp_dir.path().join("x.png").exists());
}

#[test]
fn nested_sub_folders_are_allowed() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher =
        publisher(host(false, &store, &legacy), &calls).with_sub_folder("Trips/2024");
    let locator = publisher.publish_image("beach", "image/jpeg").unwrap();

    assert_eq!(
        locator.to_file_path().unwrap(),
        temp_dir.path().join("Pictures/Trips/2024/beach.jpg")
    );
}

#[test]
fn directory_creation_failure_is_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("Pictures")).unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy {
        fail_create_dir: true,
        ..RecordingLegacy::new(temp_dir.path(), MountState::Mounted)
    });
    let calls = Calls::default();

    let mut publisher = publisher(host(false, &store, &legacy), &calls);
    let locator = publisher.publish_image("capture", "image/png").unwrap();

    let expected = temp_dir.path().join("Pictures/capture.png");
    assert_eq!(*calls.borrow(), vec![locator]);
    assert_eq!(std::fs::read(expected).unwrap(), b"pixels");
}

#[test]
fn directory_creation_failure_surfaces_as_open_failure() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy {
        fail_create_dir: true,
        ..RecordingLegacy::new(temp_dir.path(), MountState::Mounted)
    });
    let calls = Calls::default();

    let mut publisher = publisher(host(false, &store, &legacy), &calls);
    let err = publisher.publish_image("capture", "image/png").unwrap_err();

    assert!(matches!(publish_kind(err), PublishErrorKind::OpenFailed(_)));
    assert!(calls.borrow().is_empty());
}

#[test]
fn callback_error_propagates_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let invocations = Rc::new(RefCell::new(0));

    let counter = invocations.clone();
    let mut publisher = MediaPublisher::new(
        host(true, &store, &legacy),
        "Pictures",
        move |_stream: MediaStream, _locator: Locator| -> Result<(), TestError> {
            *counter.borrow_mut() += 1;
            Err(TestError::Callback("disk full"))
        },
    );

    let err = publisher
        .publish(MediaCategory::Image, "capture", "image/png")
        .unwrap_err();

    assert!(matches!(err, TestError::Callback("disk full")));
    assert_eq!(*invocations.borrow(), 1);
}

#[test]
fn capability_is_resolved_on_every_call() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let capability = Arc::new(ToggleCapability(AtomicBool::new(true)));
    let calls = Calls::default();

    let host = StorageHost::new(capability.clone(), store.clone(), legacy.clone());
    let mut publisher = publisher(host, &calls);

    let first = publisher.publish_video("clip", "video/mp4").unwrap();
    capability.0.store(false, Ordering::SeqCst);
    let second = publisher.publish_video("clip", "video/mp4").unwrap();

    assert_eq!(first.scheme(), Some("content"));
    assert_eq!(second.scheme(), Some("file"));
    assert_eq!(store.insert_count(), 1);
    assert_eq!(*calls.borrow(), vec![first, second]);
}

#[test]
fn sub_folder_and_owner_shape_the_record() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));
    let calls = Calls::default();

    let mut publisher = publisher(host(true, &store, &legacy), &calls)
        .with_owner("com.example.camera")
        .with_sub_folder("");
    assert_eq!(publisher.sub_folder(), None);
    publisher.publish_audio("theme", "audio/ogg").unwrap();

    publisher.set_sub_folder(Some("Ringtones".to_string()));
    publisher.publish_audio("bell", "audio/ogg").unwrap();

    let inserts = store.inserts.lock().unwrap();
    assert_eq!(inserts[0].1.relative_path, "Pictures");
    assert_eq!(inserts[1].1.relative_path, "Pictures/Ringtones");
    assert!(inserts.iter().all(|(category, record)| {
        *category == MediaCategory::Audio && record.owner == "com.example.camera"
    }));
}

#[test]
fn publish_errors_convert_into_flipper_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore {
        refuse_insert: true,
        ..Default::default()
    });
    let legacy = Arc::new(RecordingLegacy::new(temp_dir.path(), MountState::Mounted));

    let mut publisher = MediaPublisher::new(
        host(true, &store, &legacy),
        "Pictures",
        |_stream: MediaStream, _locator: Locator| -> Result<(), FlipperError> { Ok(()) },
    );

    let err = publisher.publish_image("capture", "image/png").unwrap_err();
    match err.kind() {
        FlipperErrorKind::Publish(e) => {
            assert!(matches!(e.kind(), PublishErrorKind::CreateFailed(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}
