//! The editor page controller: wires buffers to the live preview, export and toasts.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::buffer::{BufferChange, Buffers, Language, SourceBufferStore, Subscription};
use crate::compose::ComposedDocument;
use crate::error::PlaygroundResult;
use crate::export::{Downloader, ExportService};
use crate::notify::NotificationService;
use crate::sandbox::{ExecutionSandbox, RenderContext, RenderOutcome};

/// Last composed document and where it was rendered.
pub struct LivePreview<C> {
    sandbox: ExecutionSandbox<C>,
    document: ComposedDocument,
    compositions: u64,
    last_outcome: RenderOutcome,
}

impl<C: RenderContext> LivePreview<C> {
    fn new(sandbox: ExecutionSandbox<C>) -> Self {
        Self {
            sandbox,
            document: ComposedDocument::default(),
            compositions: 0,
            last_outcome: RenderOutcome::Skipped,
        }
    }

    fn refresh(&mut self, buffers: &Buffers) -> RenderOutcome {
        self.document = buffers.compose();
        self.compositions += 1;
        self.last_outcome = self.sandbox.render(&self.document);
        debug!(
            compositions = self.compositions,
            outcome = ?self.last_outcome,
            "preview refreshed"
        );
        self.last_outcome.clone()
    }

    pub fn document(&self) -> &ComposedDocument {
        &self.document
    }

    /// Total recompositions, including manual runs.
    pub fn compositions(&self) -> u64 {
        self.compositions
    }

    pub fn last_outcome(&self) -> &RenderOutcome {
        &self.last_outcome
    }

    pub fn sandbox(&self) -> &ExecutionSandbox<C> {
        &self.sandbox
    }
}

pub struct Playground<C, D> {
    store: SourceBufferStore,
    preview: Rc<RefCell<LivePreview<C>>>,
    _preview_subscription: Subscription,
    exporter: ExportService<D>,
    notifier: NotificationService,
}

impl<C, D> Playground<C, D>
where
    C: RenderContext + 'static,
    D: Downloader,
{
    /// Mount the editor with the default buffers and render once.
    pub fn new(sandbox: ExecutionSandbox<C>, downloader: D, notifier: NotificationService) -> Self {
        Self::with_buffers(Buffers::default(), sandbox, downloader, notifier)
    }

    pub fn with_buffers(
        buffers: Buffers,
        sandbox: ExecutionSandbox<C>,
        downloader: D,
        notifier: NotificationService,
    ) -> Self {
        let store = SourceBufferStore::new(buffers);
        let preview = Rc::new(RefCell::new(LivePreview::new(sandbox)));
        preview.borrow_mut().refresh(store.buffers());

        let p = Rc::clone(&preview);
        let subscription = store.subscribe(move |change: &BufferChange<'_>| {
            p.borrow_mut().refresh(change.buffers);
        });

        Self {
            store,
            preview,
            _preview_subscription: subscription,
            exporter: ExportService::new(downloader),
            notifier,
        }
    }

    /// Editor change event for the active tab.
    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        let language = self.store.active_language();
        self.store.set(language, text)
    }

    pub fn set(&mut self, language: Language, text: impl Into<String>) -> bool {
        self.store.set(language, text)
    }

    pub fn select(&mut self, language: Language) {
        self.store.set_active(language);
    }

    pub fn active_language(&self) -> Language {
        self.store.active_language()
    }

    /// Text shown in the editor for the active tab.
    pub fn active_text(&self) -> &str {
        self.store.get(self.store.active_language())
    }

    pub fn buffers(&self) -> &Buffers {
        self.store.buffers()
    }

    /// "Run": recompose and re-render from the current buffers, changed or not.
    pub fn run(&mut self) -> RenderOutcome {
        self.preview.borrow_mut().refresh(self.store.buffers())
    }

    /// "Save Project".
    pub fn export(&mut self) -> PlaygroundResult<()> {
        self.exporter
            .export_current(self.store.buffers(), &self.notifier)
    }

    pub fn document(&self) -> ComposedDocument {
        self.preview.borrow().document().clone()
    }

    pub fn with_preview<R>(&self, f: impl FnOnce(&LivePreview<C>) -> R) -> R {
        f(&self.preview.borrow())
    }

    pub fn notifier(&self) -> &NotificationService {
        &self.notifier
    }

    pub fn exporter(&self) -> &ExportService<D> {
        &self.exporter
    }
}
