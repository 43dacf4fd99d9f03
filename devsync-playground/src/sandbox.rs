//! Isolated rendering of composed documents.
//!
//! A render context is anything that can display a document without sharing scope,
//! storage or history with the host. The stock context is a sandboxed `srcdoc` frame:
//! `allow-scripts` without `allow-same-origin` gives the document an opaque origin, so
//! user script runs but cannot reach the host's globals, storage or navigation.

use tracing::{debug, warn};

use crate::compose::ComposedDocument;
use crate::error::PlaygroundResult;

/// Frame sandbox tokens. Never add `allow-same-origin` here.
pub const SANDBOX_POLICY: &str = "allow-scripts allow-modals";

pub trait RenderContext {
    /// Replace whatever is displayed with `document`.
    fn load(&mut self, document: &ComposedDocument) -> PlaygroundResult<()>;
}

/// Result of a render attempt. Rendering never fails outward.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderOutcome {
    Rendered,
    /// No context attached.
    #[default]
    Skipped,
    /// The context refused the document; the failure stayed inside the sandbox.
    Contained(String),
}

/// Sandboxed inline frame carrying the document in its `srcdoc` attribute.
#[derive(Debug, Clone)]
pub struct SrcdocFrame {
    title: String,
    markup: String,
    generation: u64,
}

impl Default for SrcdocFrame {
    fn default() -> Self {
        Self::new("output")
    }
}

impl SrcdocFrame {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            markup: String::new(),
            generation: 0,
        }
    }

    /// Current frame element, empty until the first load.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Number of loads so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RenderContext for SrcdocFrame {
    fn load(&mut self, document: &ComposedDocument) -> PlaygroundResult<()> {
        self.markup = format!(
            "<iframe title=\"{}\" sandbox=\"{}\" referrerpolicy=\"no-referrer\" srcdoc=\"{}\"></iframe>",
            escape_attr(&self.title),
            SANDBOX_POLICY,
            escape_attr(document.as_str()),
        );
        self.generation += 1;
        Ok(())
    }
}

/// Owns the (optional) render context and keeps every failure local.
pub struct ExecutionSandbox<C> {
    context: Option<C>,
}

impl<C: RenderContext> ExecutionSandbox<C> {
    pub fn new(context: C) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub fn detached() -> Self {
        Self { context: None }
    }

    pub fn attach(&mut self, context: C) -> Option<C> {
        self.context.replace(context)
    }

    pub fn detach(&mut self) -> Option<C> {
        self.context.take()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn render(&mut self, document: &ComposedDocument) -> RenderOutcome {
        let Some(context) = self.context.as_mut() else {
            debug!("no render context attached; skipping render");
            return RenderOutcome::Skipped;
        };
        match context.load(document) {
            Ok(()) => RenderOutcome::Rendered,
            Err(e) => {
                warn!("render contained: {}", e);
                RenderOutcome::Contained(e.to_string())
            }
        }
    }
}

/// Escape text for a double-quoted HTML attribute value.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
