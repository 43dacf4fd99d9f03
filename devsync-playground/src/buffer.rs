//! Source buffers: one text buffer per language plus the active editor tab.
//!
//! The store owns the three buffers exclusively. Every `set` that changes a value is
//! announced to subscribers; nothing else is recomputed here.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use tracing::debug;

use crate::error::PlaygroundError;

pub const DEFAULT_MARKUP: &str = "<h1>Hello, DevSync!</h1>";
pub const DEFAULT_STYLE: &str = "body { font-family: sans-serif; }";
pub const DEFAULT_SCRIPT: &str = "console.log(\"Welcome to DevSync!\");";

/// Which of the three buffers a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Markup,
    Style,
    Script,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Markup, Language::Style, Language::Script];

    /// Editor tab tag (`html`, `css`, `js`).
    pub fn tag(self) -> &'static str {
        match self {
            Language::Markup => "html",
            Language::Style => "css",
            Language::Script => "js",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" => Ok(Language::Markup),
            "css" | "style" => Ok(Language::Style),
            "js" | "javascript" | "script" => Ok(Language::Script),
            _ => Err(PlaygroundError::UnknownLanguage { tag: s.to_string() }),
        }
    }
}

/// The three buffer values. Always exactly one per language.
///
/// Missing fields deserialize to the starter snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buffers {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl Default for Buffers {
    fn default() -> Self {
        Self {
            markup: DEFAULT_MARKUP.to_string(),
            style: DEFAULT_STYLE.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
        }
    }
}

impl Buffers {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Markup => &self.markup,
            Language::Style => &self.style,
            Language::Script => &self.script,
        }
    }

    fn slot_mut(&mut self, language: Language) -> &mut String {
        match language {
            Language::Markup => &mut self.markup,
            Language::Style => &mut self.style,
            Language::Script => &mut self.script,
        }
    }
}

/// Delivered to subscribers after a buffer value changed.
#[derive(Debug)]
pub struct BufferChange<'a> {
    pub language: Language,
    pub buffers: &'a Buffers,
}

type Listener = Box<dyn FnMut(&BufferChange<'_>)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
    notifying: bool,
    /// Ids dropped while `entries` was taken out for a notification cycle.
    dropped: Vec<u64>,
}

/// Unsubscribes its callback when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut l = listeners.borrow_mut();
        let before = l.entries.len();
        l.entries.retain(|(id, _)| *id != self.id);
        if l.entries.len() == before && l.notifying {
            l.dropped.push(self.id);
        }
    }
}

pub struct SourceBufferStore {
    buffers: Buffers,
    active: Language,
    listeners: Rc<RefCell<Listeners>>,
}

impl Default for SourceBufferStore {
    fn default() -> Self {
        Self::new(Buffers::default())
    }
}

impl SourceBufferStore {
    pub fn new(buffers: Buffers) -> Self {
        Self {
            buffers,
            active: Language::Markup,
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        self.buffers.get(language)
    }

    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    pub fn active_language(&self) -> Language {
        self.active
    }

    /// Switch the editor tab. Has no effect on composition.
    pub fn set_active(&mut self, language: Language) {
        self.active = language;
    }

    /// Replace a buffer's text. Subscribers are notified only if the value changed.
    /// Returns whether it changed.
    pub fn set(&mut self, language: Language, text: impl Into<String>) -> bool {
        let text = text.into();
        let slot = self.buffers.slot_mut(language);
        if *slot == text {
            return false;
        }
        *slot = text;
        debug!(language = %language, len = self.buffers.get(language).len(), "buffer changed");
        self.emit(language);
        true
    }

    /// Like [`set`](Self::set) but addressed by editor tag. Unknown tags are ignored.
    pub fn set_by_tag(&mut self, tag: &str, text: impl Into<String>) -> bool {
        match tag.parse::<Language>() {
            Ok(language) => self.set(language, text),
            Err(e) => {
                debug!("ignoring buffer update: {}", e);
                false
            }
        }
    }

    /// Register a change callback. Callbacks run in registration order.
    pub fn subscribe(&self, listener: impl FnMut(&BufferChange<'_>) + 'static) -> Subscription {
        let mut l = self.listeners.borrow_mut();
        let id = l.next_id;
        l.next_id += 1;
        l.entries.push((id, Box::new(listener)));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    fn emit(&self, language: Language) {
        // Callbacks run with the registry released so they may drop subscriptions.
        let mut taken = {
            let mut l = self.listeners.borrow_mut();
            l.notifying = true;
            std::mem::take(&mut l.entries)
        };
        let change = BufferChange {
            language,
            buffers: &self.buffers,
        };
        for (_, listener) in taken.iter_mut() {
            listener(&change);
        }
        let mut l = self.listeners.borrow_mut();
        let dropped = std::mem::take(&mut l.dropped);
        taken.retain(|(id, _)| !dropped.contains(id));
        let added = std::mem::take(&mut l.entries);
        taken.extend(added);
        l.entries = taken;
        l.notifying = false;
    }
}
