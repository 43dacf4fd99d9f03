use devsync_playground::{
    compose, Buffers, ComposedDocument, DirectoryDownloader, Downloader, ExecutionSandbox,
    ExportService, InboundSignal, Language, NotificationKind, NotificationService, ObjectUrl,
    Playground, PlaygroundError, PlaygroundResult, RenderContext, RenderOutcome,
    SourceBufferStore, SrcdocFrame, EXPORT_FILE_NAME,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::Duration;

/// Render context that remembers every document it was given.
#[derive(Clone, Default)]
struct RecordingContext {
    loads: Rc<RefCell<Vec<String>>>,
}

impl RenderContext for RecordingContext {
    fn load(&mut self, document: &ComposedDocument) -> PlaygroundResult<()> {
        self.loads.borrow_mut().push(document.as_str().to_string());
        Ok(())
    }
}

/// Downloader the platform refuses to serve.
struct BlockedDownloader;

impl Downloader for BlockedDownloader {
    fn download(&mut self, _url: &ObjectUrl, file_name: &str) -> PlaygroundResult<()> {
        Err(PlaygroundError::DownloadFailed {
            file_name: file_name.to_string(),
            reason: "popup blocked".to_string(),
        })
    }
}

fn recording_playground(
    dir: &std::path::Path,
) -> (Playground<RecordingContext, DirectoryDownloader>, RecordingContext) {
    let ctx = RecordingContext::default();
    let playground = Playground::new(
        ExecutionSandbox::new(ctx.clone()),
        DirectoryDownloader::new(dir),
        NotificationService::new(),
    );
    (playground, ctx)
}

#[test]
fn test_mount_renders_default_buffers_once() {
    let dir = tempfile::tempdir().unwrap();
    let (playground, ctx) = recording_playground(dir.path());
    assert_eq!(ctx.loads.borrow().len(), 1);
    assert_eq!(ctx.loads.borrow()[0], Buffers::default().compose().as_str());
    assert_eq!(playground.with_preview(|p| p.compositions()), 1);
}

#[test]
fn test_each_edit_recomposes_and_rerenders() {
    let dir = tempfile::tempdir().unwrap();
    let (mut playground, ctx) = recording_playground(dir.path());

    playground.set(Language::Markup, "<h1>Hi</h1>");
    playground.set(Language::Style, "body{color:red}");
    playground.set(Language::Script, "console.log(1)");

    let expected = compose("<h1>Hi</h1>", "body{color:red}", "console.log(1)");
    assert_eq!(ctx.loads.borrow().len(), 4);
    assert_eq!(ctx.loads.borrow().last().unwrap(), expected.as_str());
    assert_eq!(playground.document(), expected);
}

#[test]
fn test_unchanged_edit_does_not_rerender() {
    let dir = tempfile::tempdir().unwrap();
    let (mut playground, ctx) = recording_playground(dir.path());
    let current = playground.buffers().markup.clone();
    assert!(!playground.set(Language::Markup, current));
    assert_eq!(ctx.loads.borrow().len(), 1);
}

#[test]
fn test_edit_targets_active_tab_only() {
    let dir = tempfile::tempdir().unwrap();
    let (mut playground, _ctx) = recording_playground(dir.path());

    playground.select(Language::Script);
    assert_eq!(playground.active_text(), playground.buffers().script);
    playground.edit("alert('x')");

    assert_eq!(playground.buffers().script, "alert('x')");
    assert_eq!(playground.buffers().markup, Buffers::default().markup);
    assert_eq!(playground.buffers().style, Buffers::default().style);
}

#[test]
fn test_tab_switch_does_not_recompose() {
    let dir = tempfile::tempdir().unwrap();
    let (mut playground, ctx) = recording_playground(dir.path());
    playground.select(Language::Style);
    playground.select(Language::Markup);
    assert_eq!(ctx.loads.borrow().len(), 1);
}

#[test]
fn test_run_recomposes_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let (mut playground, ctx) = recording_playground(dir.path());
    let before = playground.document();

    assert_eq!(playground.run(), RenderOutcome::Rendered);
    assert_eq!(playground.run(), RenderOutcome::Rendered);

    assert_eq!(ctx.loads.borrow().len(), 3);
    assert_eq!(playground.document(), before);
    assert_eq!(playground.with_preview(|p| p.compositions()), 3);
}

#[test]
fn test_changing_one_buffer_leaves_other_slots_in_place() {
    let base = compose("<p>m</p>", "s{}", "j()");

    let style = compose("<p>m</p>", "t{}", "j()");
    assert_ne!(base, style);
    assert_eq!(base.as_str().replace("s{}", "t{}"), style.as_str());

    // Longer markup shifts the script slot but keeps it intact.
    let markup = compose("<section>much longer</section>", "s{}", "j()");
    assert_ne!(base, markup);
    assert_eq!(
        base.as_str().replace("<p>m</p>", "<section>much longer</section>"),
        markup.as_str()
    );
    assert!(markup.as_str().contains("<style>s{}</style>"));
    assert!(markup.as_str().contains("<script>j()</script>"));

    let script = compose("<p>m</p>", "s{}", "k(1, 2)");
    assert_ne!(base, script);
    assert_eq!(base.as_str().replace("j()", "k(1, 2)"), script.as_str());
    assert!(script.as_str().contains("<style>s{}</style>"));
    assert!(script.as_str().contains("<p>m</p>"));
}

#[test]
fn test_detached_sandbox_skips_but_still_composes() {
    let dir = tempfile::tempdir().unwrap();
    let mut playground = Playground::new(
        ExecutionSandbox::<SrcdocFrame>::detached(),
        DirectoryDownloader::new(dir.path()),
        NotificationService::new(),
    );
    playground.set(Language::Markup, "<p>x</p>");
    assert_eq!(
        playground.with_preview(|p| p.last_outcome().clone()),
        RenderOutcome::Skipped
    );
    assert!(playground.document().as_str().contains("<p>x</p>"));
}

#[test]
fn test_srcdoc_frame_tracks_latest_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut playground = Playground::new(
        ExecutionSandbox::new(SrcdocFrame::default()),
        DirectoryDownloader::new(dir.path()),
        NotificationService::new(),
    );
    playground.set(Language::Markup, "<em>latest</em>");
    let markup = playground.with_preview(|p| p.sandbox().context().unwrap().markup().to_string());
    assert!(markup.contains("&lt;em&gt;latest&lt;/em&gt;"));
}

#[test]
fn test_export_writes_project_html_and_notifies() {
    let dir = tempfile::tempdir().unwrap();
    let (mut playground, _ctx) = recording_playground(dir.path());
    playground.set(Language::Markup, "<h2>export me</h2>");

    playground.export().unwrap();

    let written = fs::read_to_string(dir.path().join(EXPORT_FILE_NAME)).unwrap();
    assert_eq!(written, playground.buffers().compose().as_str());
    let n = playground.notifier().current().unwrap();
    assert_eq!(n.kind, NotificationKind::Success);
    assert_eq!(n.message, "Project saved successfully!");
    assert_eq!(playground.exporter().blobs().live_count(), 0);
}

#[test]
fn test_export_uses_buffers_at_call_time() {
    // No subscriber: nothing recomposes between the edit and the export.
    let dir = tempfile::tempdir().unwrap();
    let mut store = SourceBufferStore::default();
    let stale = store.buffers().compose();
    store.set(Language::Style, "h1{color:blue}");

    let notifier = NotificationService::new();
    let mut exporter = ExportService::new(DirectoryDownloader::new(dir.path()));
    exporter.export_current(store.buffers(), &notifier).unwrap();

    let written = fs::read_to_string(dir.path().join(EXPORT_FILE_NAME)).unwrap();
    assert_ne!(written, stale.as_str());
    assert!(written.contains("<style>h1{color:blue}</style>"));
}

#[test]
fn test_failed_export_reports_error_kind() {
    let mut playground = Playground::new(
        ExecutionSandbox::<SrcdocFrame>::detached(),
        BlockedDownloader,
        NotificationService::new(),
    );
    assert!(playground.export().is_err());
    let n = playground.notifier().current().unwrap();
    assert_eq!(n.kind, NotificationKind::Error);
    assert!(n.message.contains("popup blocked"));
}

#[tokio::test(start_paused = true)]
async fn test_second_notification_replaces_first() {
    let notifier = NotificationService::new();
    notifier.notify("A", NotificationKind::Success);
    tokio::time::sleep(Duration::from_millis(500)).await;
    notifier.notify("B", NotificationKind::Error);

    let visible = notifier.current().unwrap();
    assert_eq!(visible.message, "B");
    assert_eq!(visible.kind, NotificationKind::Error);

    // A's deadline passes; B stays.
    tokio::time::sleep(Duration::from_millis(2600)).await;
    assert_eq!(notifier.current().unwrap().message, "B");

    // B's own deadline: 500 + 3000.
    tokio::time::sleep(Duration::from_millis(401)).await;
    assert!(notifier.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_signal_announces_success_once() {
    let notifier = NotificationService::new();
    let mut rx = notifier.subscribe();

    let signal = InboundSignal::from_url("?message=Saved%20ok").unwrap();
    assert!(signal.announce(&notifier).is_some());

    rx.changed().await.unwrap();
    let n = rx.borrow_and_update().clone().unwrap();
    assert_eq!(n.message, "Saved ok");
    assert_eq!(n.kind, NotificationKind::Success);

    let none = InboundSignal::from_url("/codeEditor").unwrap();
    assert!(none.announce(&notifier).is_none());
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn test_compose_bin_reads_dash_buffer_from_stdin() {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let dir = tempfile::tempdir().unwrap();
    let markup = dir.path().join("index.html");
    let script = dir.path().join("app.js");
    fs::write(&markup, "<p>m</p>").unwrap();
    fs::write(&script, "j()").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_devsync-compose"))
        .arg(&markup)
        .arg("-")
        .arg(&script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"h1{}").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        compose("<p>m</p>", "h1{}", "j()").as_str()
    );
}
