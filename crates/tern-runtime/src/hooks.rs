//! Lifecycle hooks registered by built-in libraries.
//!
//! `hw_init`, `init`, `kill` and `idle` run on the engine thread with the
//! runtime at hand. Character hooks are different: [`CharDispatch`] may be
//! called from an interrupt handler or another thread, so it holds only
//! `Send + Sync` handlers and never allocates or takes a lock.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use tern_core::EventChannel;

use crate::runtime::Runtime;

pub type EngineHook = Box<dyn FnMut(&mut Runtime)>;
pub type IdleHook = Box<dyn FnMut(&mut Runtime) -> bool>;
/// Returns `true` if the byte was consumed.
pub type CharHandler = Arc<dyn Fn(u8) -> bool + Send + Sync>;

/// Hook registrations, in the order libraries are declared.
#[derive(Default)]
pub struct Hooks {
    pub(crate) hw_init: Vec<fn()>,
    pub(crate) init: Vec<EngineHook>,
    pub(crate) kill: Vec<EngineHook>,
    pub(crate) idle: Vec<IdleHook>,
    pub(crate) chars: Vec<(EventChannel, CharHandler)>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("hw_init", &self.hw_init.len())
            .field("init", &self.init.len())
            .field("kill", &self.kill.len())
            .field("idle", &self.idle.len())
            .field("chars", &self.chars.len())
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once, before the engine exists.
    pub fn on_hw_init(mut self, hook: fn()) -> Self {
        self.hw_init.push(hook);
        self
    }

    pub fn on_init(mut self, hook: impl FnMut(&mut Runtime) + 'static) -> Self {
        self.init.push(Box::new(hook));
        self
    }

    pub fn on_kill(mut self, hook: impl FnMut(&mut Runtime) + 'static) -> Self {
        self.kill.push(Box::new(hook));
        self
    }

    /// `hook` returns `true` while it still has work pending.
    pub fn on_idle(mut self, hook: impl FnMut(&mut Runtime) -> bool + 'static) -> Self {
        self.idle.push(Box::new(hook));
        self
    }

    pub fn on_char(
        mut self,
        channel: EventChannel,
        handler: impl Fn(u8) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.chars.push((channel, Arc::new(handler)));
        self
    }

    /// Append every registration of `other` after ours.
    pub fn merge(mut self, other: Hooks) -> Self {
        self.hw_init.extend(other.hw_init);
        self.init.extend(other.init);
        self.kill.extend(other.kill);
        self.idle.extend(other.idle);
        self.chars.extend(other.chars);
        self
    }

    pub(crate) fn char_dispatch(&self) -> CharDispatch {
        CharDispatch {
            handlers: self.chars.iter().cloned().collect(),
        }
    }
}

/// Character-received fan-out. Cheap to clone and safe to call from any
/// thread.
#[derive(Clone, Default)]
pub struct CharDispatch {
    handlers: Arc<[(EventChannel, CharHandler)]>,
}

impl fmt::Debug for CharDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharDispatch")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl CharDispatch {
    /// Offer `byte` to the handlers of `channel` until one consumes it.
    pub fn on_char_event(&self, channel: EventChannel, byte: u8) -> bool {
        self.handlers
            .iter()
            .filter(|(ch, _)| *ch == channel)
            .any(|(_, handler)| handler(byte))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Single-producer single-consumer byte ring.
///
/// The producer side ([`push`](Self::push)) is what a character handler
/// calls; it never blocks or allocates. The engine drains the queue from
/// an idle hook.
pub struct CharQueue {
    buf: Box<[AtomicU8]>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl CharQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: (0..capacity + 1).map(|_| AtomicU8::new(0)).collect(),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len() - 1
    }

    /// Producer side. Returns `false` when full.
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % self.buf.len();
        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }
        self.buf[head].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Consumer side.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.buf[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % self.buf.len(), Ordering::Release);
        Some(byte)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + self.buf.len() - tail) % self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Evaluates script source on behalf of the runtime.
///
/// The runtime only locates scripts; running them belongs to the
/// interpreter that embeds it.
pub trait ScriptHost {
    fn evaluate(&mut self, runtime: &mut Runtime, name: &str, source: &str);
}

/// Host that skips evaluation.
pub struct NoScriptHost;

impl ScriptHost for NoScriptHost {
    fn evaluate(&mut self, _runtime: &mut Runtime, name: &str, source: &str) {
        log::debug!("skipping script `{name}` ({} bytes)", source.len());
    }
}
