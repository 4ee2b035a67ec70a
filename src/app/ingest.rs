// ImageRef - app/ingest.rs
//
// Ingestion lifecycle management. Reads and decodes payloads on background
// workers and sends one completion event per payload to the UI thread via
// an mpsc channel.
//
// Architecture:
//   - `IngestManager` lives on the UI thread. Decodes run on a small rayon
//     pool sized to the machine (at most `MAX_DECODE_WORKERS`), so a large
//     upload queues instead of decoding everything at once. Payloads finish
//     in whatever order they finish.
//   - Clipboard reads and camera captures block on the OS, so each runs on
//     its own named thread instead of occupying a decode worker.
//   - Workers never touch the gallery. The UI thread drains the channel with
//     `poll_events` and applies events one at a time, so each append is a
//     single discrete state update and no lock guards the collection.
//   - There is no cancellation and no timeout: a started task always runs to
//     success or failure.
//
// Failure handling:
//   - Transient I/O errors are retried with capped backoff.
//   - Every per-payload error is non-fatal and becomes an `IngestEvent::Failed`.
//   - A panicking task is caught and reported as `IngestError::WorkerPanicked`;
//     its in-flight slot is released by `InFlightGuard` either way.

use crate::core::clipboard::{self, ClipboardItem};
use crate::core::decode;
use crate::core::model::{IngestEvent, IngestSource, RawPayload};
use crate::util::constants::{
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_THUMBNAIL_EDGE, MAX_DECODE_WORKERS, MAX_READ_RETRIES,
    READ_RETRY_DELAYS_MS,
};
use crate::util::error::{CaptureError, ImageRefError, IngestError};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Callback invoked after each event is sent, so an idle UI wakes up to
/// apply it. The GUI passes `egui::Context::request_repaint`.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// Seams for the OS-facing channels
// =============================================================================

/// Source of clipboard contents.
pub trait ClipboardSource: Send + 'static {
    /// Everything currently on the clipboard. An empty or unreadable
    /// clipboard yields an empty list.
    fn read_items(&mut self) -> Vec<ClipboardItem>;
}

/// A file produced by a capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFile {
    pub path: PathBuf,
    /// Delete the file once it has been read.
    pub temporary: bool,
}

/// A device that can take one photo on request.
pub trait CaptureDevice: Send + 'static {
    /// Take a photo. `Ok(None)` means the user backed out.
    fn capture(&self) -> Result<Option<CapturedFile>, CaptureError>;
}

// =============================================================================
// IngestManager
// =============================================================================

/// Limits applied to every ingestion task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSettings {
    /// Files larger than this are rejected before being read.
    pub max_file_bytes: u64,
    /// Longest edge of generated thumbnails, in pixels.
    pub thumbnail_edge: u32,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            thumbnail_edge: DEFAULT_THUMBNAIL_EDGE,
        }
    }
}

/// Holds one slot of the in-flight count. Dropping it wakes the UI and
/// releases the slot, including when the task unwinds.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
    waker: Option<Waker>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some(ref wake) = self.waker {
            wake();
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared handles every task needs to report back.
#[derive(Clone)]
struct TaskContext {
    tx: mpsc::Sender<IngestEvent>,
    in_flight: Arc<AtomicUsize>,
    waker: Option<Waker>,
    settings: IngestSettings,
    /// `None` if the dedicated pool could not be built; rayon's global pool
    /// is used instead.
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl TaskContext {
    /// Register a task before it is queued, so `in_flight` never reads zero
    /// while work is still pending.
    fn begin(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            waker: self.waker.clone(),
        }
    }

    fn send(&self, event: IngestEvent) {
        // Receiver dropped means the UI has closed; nothing left to do.
        let _ = self.tx.send(event);
    }

    /// Queue one decode on the worker pool. `origin` names the payload if
    /// the task panics.
    fn spawn_decode(
        &self,
        source: IngestSource,
        origin: String,
        task: impl FnOnce(&IngestSettings) -> IngestEvent + Send + 'static,
    ) {
        let guard = self.begin();
        let ctx = self.clone();
        let job = move || {
            let _guard = guard;
            let event = catch_panic(source, origin, || task(&ctx.settings));
            ctx.send(event);
        };
        match self.pool {
            Some(ref pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }

    /// Run a blocking task on its own named thread. The task may return an
    /// event to send; a panic is reported as a failure of `source`.
    fn spawn_blocking(
        &self,
        name: &str,
        source: IngestSource,
        task: impl FnOnce(&TaskContext) -> Option<IngestEvent> + Send + 'static,
    ) {
        let guard = self.begin();
        let ctx = self.clone();
        let spawned = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _guard = guard;
                let event = catch_panic(source, source.label().to_string(), || task(&ctx));
                if let Some(event) = event {
                    ctx.send(event);
                }
            });

        if let Err(e) = spawned {
            tracing::error!(thread = name, error = %e, "Cannot start worker thread");
            self.send(IngestEvent::Failed {
                source,
                origin: source.label().to_string(),
                error: IngestError::WorkerUnavailable { source: e }.into(),
            });
            if let Some(ref wake) = self.waker {
                wake();
            }
        }
    }
}

/// Runs ingestion tasks on background workers.
pub struct IngestManager {
    rx: mpsc::Receiver<IngestEvent>,
    ctx: TaskContext,
}

impl IngestManager {
    pub fn new(settings: IngestSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            ctx: TaskContext {
                tx,
                in_flight: Arc::new(AtomicUsize::new(0)),
                waker: None,
                settings,
                pool: build_decode_pool(),
            },
        }
    }

    /// Install the callback run after every completed task.
    pub fn set_waker(&mut self, waker: Waker) {
        self.ctx.waker = Some(waker);
    }

    /// Number of tasks started but not yet reported.
    pub fn in_flight(&self) -> usize {
        self.ctx.in_flight.load(Ordering::SeqCst)
    }

    /// Number of payloads that may decode at the same time.
    pub fn decode_workers(&self) -> usize {
        match self.ctx.pool {
            Some(ref pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Read and decode each file on the worker pool.
    ///
    /// Uploads are labelled with their file name; other sources use their
    /// fixed label.
    pub fn ingest_files(&self, source: IngestSource, paths: Vec<PathBuf>) {
        tracing::info!(%source, files = paths.len(), "Ingesting files");
        for path in paths {
            let origin = origin_for(&path, source);
            self.ctx
                .spawn_decode(source, origin, move |settings| load_file(&path, source, settings));
        }
    }

    /// Decode already-obtained payloads on the worker pool.
    pub fn ingest_payloads(&self, source: IngestSource, payloads: Vec<RawPayload>) {
        tracing::info!(%source, payloads = payloads.len(), "Ingesting payloads");
        for payload in payloads {
            self.ctx.spawn_decode(source, source.label().to_string(), move |settings| {
                decode_to_event(payload, source, None, settings)
            });
        }
    }

    /// Read the clipboard off the UI thread and ingest every image item on it.
    ///
    /// Non-image items are ignored; a clipboard with no image is a silent no-op.
    pub fn ingest_clipboard(&self, mut reader: impl ClipboardSource) {
        // The reader holds an in-flight slot of its own, covering the gap
        // between the paste and the decodes being queued.
        self.ctx
            .spawn_blocking("imageref-clipboard", IngestSource::Paste, move |ctx| {
                let items = reader.read_items();
                let total = items.len();
                let payloads = clipboard::image_payloads(items);
                tracing::debug!(items = total, images = payloads.len(), "Clipboard read");
                if payloads.is_empty() {
                    tracing::info!("Paste ignored: no image on the clipboard");
                }
                for payload in payloads {
                    ctx.spawn_decode(
                        IngestSource::Paste,
                        IngestSource::Paste.label().to_string(),
                        move |settings| decode_to_event(payload, IngestSource::Paste, None, settings),
                    );
                }
                None
            });
    }

    /// Take a photo with `device` on its own thread, then read and decode it.
    pub fn capture(&self, device: impl CaptureDevice) {
        tracing::info!("Camera capture started");
        self.ctx
            .spawn_blocking("imageref-capture", IngestSource::Camera, move |ctx| {
                let event = match device.capture() {
                    Ok(Some(file)) => {
                        let event = load_file(&file.path, IngestSource::Camera, &ctx.settings);
                        if file.temporary {
                            if let Err(e) = std::fs::remove_file(&file.path) {
                                tracing::debug!(
                                    file = %file.path.display(),
                                    error = %e,
                                    "Could not remove temporary capture file"
                                );
                            }
                        }
                        event
                    }
                    Ok(None) => IngestEvent::CaptureCancelled,
                    Err(e) => IngestEvent::Failed {
                        source: IngestSource::Camera,
                        origin: IngestSource::Camera.label().to_string(),
                        error: e.into(),
                    },
                };
                Some(event)
            });
    }

    /// Drain all pending events without blocking.
    pub fn poll_events(&self) -> Vec<IngestEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for IngestManager {
    fn default() -> Self {
        Self::new(IngestSettings::default())
    }
}

/// Worker count for the decode pool: the available cores, capped.
fn decode_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_DECODE_WORKERS)
}

fn build_decode_pool() -> Option<Arc<rayon::ThreadPool>> {
    let workers = decode_worker_count();
    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("imageref-decode-{i}"))
        .panic_handler(|_| tracing::error!("Decode worker panicked outside a task"))
        .build()
    {
        Ok(pool) => {
            tracing::debug!(workers, "Decode pool started");
            Some(Arc::new(pool))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cannot build decode pool, using the global rayon pool");
            None
        }
    }
}

/// Run `task`, turning a panic into a failure event for `origin`.
fn catch_panic<T: From<IngestEvent>>(
    source: IngestSource,
    origin: String,
    task: impl FnOnce() -> T,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(value) => value,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(%source, origin = %origin, message = %message, "Ingestion task panicked");
            T::from(IngestEvent::Failed {
                source,
                origin,
                error: IngestError::WorkerPanicked { message }.into(),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// Worker bodies
// =============================================================================

/// Read `path` and decode it into an event.
fn load_file(path: &Path, source: IngestSource, settings: &IngestSettings) -> IngestEvent {
    let file_name = match source {
        IngestSource::Upload => Some(display_name(path)),
        _ => None,
    };

    match read_file_with_retry(path, settings.max_file_bytes) {
        Ok(bytes) => decode_to_event(RawPayload::Encoded { bytes }, source, file_name, settings),
        Err(e) => {
            tracing::warn!(file = %path.display(), %source, error = %e, "Cannot read image file");
            IngestEvent::Failed {
                source,
                origin: file_name.unwrap_or_else(|| source.label().to_string()),
                error: e.into(),
            }
        }
    }
}

fn decode_to_event(
    payload: RawPayload,
    source: IngestSource,
    file_name: Option<String>,
    settings: &IngestSettings,
) -> IngestEvent {
    match decode::decode_payload(payload, settings.thumbnail_edge) {
        Ok(data) => {
            tracing::debug!(
                %source,
                width = data.full.width,
                height = data.full.height,
                "Payload decoded"
            );
            IngestEvent::Decoded {
                source,
                file_name,
                data,
            }
        }
        Err(e) => {
            let origin = file_name.unwrap_or_else(|| source.label().to_string());
            tracing::warn!(%source, origin = %origin, error = %e, "Payload is not a decodable image");
            IngestEvent::Failed {
                source,
                origin,
                error: ImageRefError::Decode(e),
            }
        }
    }
}

/// How a file is named in failure messages before it has been read.
fn origin_for(path: &Path, source: IngestSource) -> String {
    match source {
        IngestSource::Upload => display_name(path),
        _ => source.label().to_string(),
    }
}

/// The final path component, lossily converted, for use as a label.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a whole file, rejecting anything over `max_bytes`.
///
/// Transient I/O errors (WouldBlock, Interrupted, TimedOut) are retried with
/// capped backoff. Permanent errors are returned immediately.
fn read_file_with_retry(path: &Path, max_bytes: u64) -> Result<Vec<u8>, IngestError> {
    let io_err = |source: io::Error| IngestError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_bytes {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: max_bytes,
        });
    }

    let mut last_err: Option<io::Error> = None;
    for attempt in 0..MAX_READ_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(
                    READ_RETRY_DELAYS_MS[attempt as usize],
                ));
                last_err = Some(e);
            }
            Err(e) => return Err(io_err(e)),
        }
    }

    Err(io_err(
        last_err.unwrap_or_else(|| io::Error::other("Unknown read error")),
    ))
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::time::Instant;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    /// Block until every started task has reported, then drain the channel.
    fn settle(manager: &IngestManager) -> Vec<IngestEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.in_flight() > 0 {
            assert!(Instant::now() < deadline, "ingestion did not settle");
            std::thread::sleep(Duration::from_millis(5));
        }
        manager.poll_events()
    }

    struct FakeClipboard(Vec<ClipboardItem>);

    impl ClipboardSource for FakeClipboard {
        fn read_items(&mut self) -> Vec<ClipboardItem> {
            std::mem::take(&mut self.0)
        }
    }

    struct FakeCamera(Option<CapturedFile>);

    impl CaptureDevice for FakeCamera {
        fn capture(&self) -> Result<Option<CapturedFile>, CaptureError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCamera;

    struct PanickingClipboard;

    impl ClipboardSource for PanickingClipboard {
        fn read_items(&mut self) -> Vec<ClipboardItem> {
            panic!("clipboard backend crashed")
        }
    }

    struct PanickingCamera;

    impl CaptureDevice for PanickingCamera {
        fn capture(&self) -> Result<Option<CapturedFile>, CaptureError> {
            panic!("camera driver crashed")
        }
    }

    impl CaptureDevice for BrokenCamera {
        fn capture(&self) -> Result<Option<CapturedFile>, CaptureError> {
            Err(CaptureError::EmptyCommand)
        }
    }

    #[test]
    fn test_upload_events_carry_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_png(dir.path(), "a.png", 2, 2),
            write_png(dir.path(), "b.png", 3, 3),
        ];
        let manager = IngestManager::default();
        manager.ingest_files(IngestSource::Upload, paths);

        let mut names: Vec<String> = settle(&manager)
            .into_iter()
            .map(|e| match e {
                IngestEvent::Decoded {
                    file_name: Some(name),
                    ..
                } => name,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_missing_file_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let manager = IngestManager::default();
        manager.ingest_files(IngestSource::Upload, vec![dir.path().join("nope.png")]);

        let events = settle(&manager);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            IngestEvent::Failed {
                error: ImageRefError::Ingest(IngestError::Io { .. }),
                origin,
                ..
            } if origin == "nope.png"
        ));
    }

    #[test]
    fn test_oversized_file_is_rejected_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "big.png", 64, 64);
        let manager = IngestManager::new(IngestSettings {
            max_file_bytes: 8,
            ..Default::default()
        });
        manager.ingest_files(IngestSource::Upload, vec![path]);

        let events = settle(&manager);
        assert!(matches!(
            events.as_slice(),
            [IngestEvent::Failed {
                error: ImageRefError::Ingest(IngestError::FileTooLarge { max_size: 8, .. }),
                ..
            }]
        ));
    }

    #[test]
    fn test_clipboard_ingests_only_images() {
        let manager = IngestManager::default();
        manager.ingest_clipboard(FakeClipboard(vec![
            ClipboardItem::Text("caption".to_string()),
            ClipboardItem::Image {
                width: 1,
                height: 1,
                bytes: vec![1, 2, 3, 255],
            },
        ]));

        let events = settle(&manager);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            IngestEvent::Decoded {
                source: IngestSource::Paste,
                file_name: None,
                ..
            }
        ));
    }

    #[test]
    fn test_clipboard_without_image_is_silent() {
        let manager = IngestManager::default();
        manager.ingest_clipboard(FakeClipboard(vec![ClipboardItem::Text("x".to_string())]));
        assert!(settle(&manager).is_empty());
    }

    #[test]
    fn test_camera_cancel_reports_cancelled() {
        let manager = IngestManager::default();
        manager.capture(FakeCamera(None));
        let events = settle(&manager);
        assert!(matches!(events.as_slice(), [IngestEvent::CaptureCancelled]));
    }

    #[test]
    fn test_camera_temporary_file_is_removed_after_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "capture.png", 4, 4);
        let manager = IngestManager::default();
        manager.capture(FakeCamera(Some(CapturedFile {
            path: path.clone(),
            temporary: true,
        })));

        let events = settle(&manager);
        assert!(matches!(
            events.as_slice(),
            [IngestEvent::Decoded {
                source: IngestSource::Camera,
                file_name: None,
                ..
            }]
        ));
        assert!(!path.exists(), "temporary capture should be deleted");
    }

    #[test]
    fn test_camera_error_becomes_failed_event() {
        let manager = IngestManager::default();
        manager.capture(BrokenCamera);
        let events = settle(&manager);
        assert!(matches!(
            events.as_slice(),
            [IngestEvent::Failed {
                source: IngestSource::Camera,
                error: ImageRefError::Capture(CaptureError::EmptyCommand),
                ..
            }]
        ));
    }

    #[test]
    fn test_waker_runs_per_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut manager = IngestManager::default();
        manager.set_waker(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        manager.ingest_payloads(
            IngestSource::Paste,
            vec![
                RawPayload::Encoded { bytes: vec![1, 2] },
                RawPayload::Encoded { bytes: vec![3, 4] },
            ],
        );
        let events = settle(&manager);
        assert_eq!(events.len(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_clipboard_releases_slot_and_reports() {
        let manager = IngestManager::default();
        manager.ingest_clipboard(PanickingClipboard);

        let events = settle(&manager);
        assert_eq!(manager.in_flight(), 0);
        match events.as_slice() {
            [IngestEvent::Failed {
                source: IngestSource::Paste,
                error: ImageRefError::Ingest(IngestError::WorkerPanicked { message }),
                ..
            }] => assert!(message.contains("clipboard backend crashed"), "{message}"),
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn test_panicking_camera_releases_slot_and_reports() {
        let manager = IngestManager::default();
        manager.capture(PanickingCamera);

        let events = settle(&manager);
        assert_eq!(manager.in_flight(), 0);
        assert!(matches!(
            events.as_slice(),
            [IngestEvent::Failed {
                source: IngestSource::Camera,
                error: ImageRefError::Ingest(IngestError::WorkerPanicked { .. }),
                ..
            }]
        ));
    }

    #[test]
    fn test_decode_pool_is_bounded() {
        let manager = IngestManager::default();
        let workers = manager.decode_workers();
        assert!((1..=MAX_DECODE_WORKERS).contains(&workers), "{workers} workers");
    }

    #[test]
    fn test_large_batch_queues_and_completes() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..40)
            .map(|i| write_png(dir.path(), &format!("img{i:02}.png"), 3, 2))
            .collect();
        let manager = IngestManager::default();
        manager.ingest_files(IngestSource::Upload, paths);

        let events = settle(&manager);
        assert_eq!(events.len(), 40);
        assert!(events
            .iter()
            .all(|e| matches!(e, IngestEvent::Decoded { .. })));
    }

    #[test]
    fn test_panic_message_from_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(boxed.as_ref()), "static text");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned text"));
        assert_eq!(panic_message(boxed.as_ref()), "owned text");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
