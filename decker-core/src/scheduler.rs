//! Typewriter output scheduler.
//!
//! All text leaving the process goes through a single pending buffer that a
//! drain task empties one unit at a time on a timer. Writes issued while the
//! drain is running extend the same buffer and share the same completion
//! handle, so every writer can await the moment the whole backlog has been
//! displayed.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration};

use crate::style;

/// Default per-unit delay for normal output.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(20);
/// Delay for status banners and other snappy output.
pub const FAST_DELAY: Duration = Duration::from_millis(10);
/// Delay for dramatic output.
pub const SLOW_DELAY: Duration = Duration::from_millis(100);
/// Delay for table output, which tends to be wide.
pub const TABLE_DELAY: Duration = Duration::from_millis(5);

/// Resolves once everything buffered at (or after) the originating write has
/// been emitted. Cloneable; every writer in the same drain cycle holds the
/// same handle.
pub type FlushHandle = Shared<BoxFuture<'static, ()>>;

struct Inner {
    buf: String,
    cursor: usize,
    pending: Option<FlushHandle>,
    sink: Box<dyn Write + Send>,
    columns: Option<usize>,
}

/// The output scheduler. One per session; owns the terminal's write side.
pub struct Scheduler {
    inner: Arc<Mutex<Inner>>,
}

impl Scheduler {
    /// Scheduler writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Scheduler writing to an arbitrary sink. Used by tests to capture
    /// output.
    pub fn with_writer(sink: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                buf: String::new(),
                cursor: 0,
                pending: None,
                sink,
                columns: None,
            })),
        }
    }

    /// Fix the column count used by [`write_table`](Self::write_table)
    /// instead of querying the terminal.
    pub fn set_columns(&self, columns: usize) {
        self.inner.lock().unwrap().columns = Some(columns);
    }

    /// Append `text` (plus a newline) to the pending buffer at the default
    /// pace and return the completion handle for the current drain cycle.
    pub fn write(&self, text: &str) -> FlushHandle {
        self.write_opts(text, true, DEFAULT_DELAY)
    }

    /// Like [`write`](Self::write) at the fast pace.
    pub fn fast(&self, text: &str) -> FlushHandle {
        self.write_opts(text, true, FAST_DELAY)
    }

    /// Like [`write`](Self::write) at the slow pace.
    pub fn slow(&self, text: &str) -> FlushHandle {
        self.write_opts(text, true, SLOW_DELAY)
    }

    /// Full-form write. `delay` only takes effect when this call starts a new
    /// drain cycle; writes that join a running cycle inherit its pace.
    pub fn write_opts(&self, text: &str, newline: bool, delay: Duration) -> FlushHandle {
        let mut inner = self.inner.lock().unwrap();
        inner.buf.push_str(text);
        if newline {
            inner.buf.push('\n');
        }

        if let Some(handle) = &inner.pending {
            return handle.clone();
        }

        let (tx, rx) = oneshot::channel::<()>();
        let handle: FlushHandle = async move {
            let _ = rx.await;
        }
        .boxed()
        .shared();
        inner.pending = Some(handle.clone());
        drop(inner);

        self.spawn_drain(delay, tx);
        handle
    }

    /// Write `text` immediately, bypassing the animation. Only safe for
    /// cosmetic output issued while nothing is pending (the boot sequence's
    /// step titles).
    pub fn write_now(&self, text: &str) {
        let mut inner = self.inner.lock().unwrap();
        let _ = inner.sink.write_all(text.as_bytes());
        let _ = inner.sink.flush();
    }

    /// The outstanding completion handle, if any output is in flight. Doubles
    /// as the synchronous "is output animating?" check.
    pub fn pending(&self) -> Option<FlushHandle> {
        self.inner.lock().unwrap().pending.clone()
    }

    /// The outstanding completion handle, or an already-resolved one when the
    /// scheduler is idle.
    pub fn flushed(&self) -> FlushHandle {
        self.pending().unwrap_or_else(|| async {}.boxed().shared())
    }

    /// Success banner (`SUCCESS`-style, black on green) at the fast pace.
    pub fn success(&self, msg: &str) -> FlushHandle {
        self.write_opts(&style::success(msg), true, FAST_DELAY)
    }

    /// Failure banner (black on red) at the fast pace.
    pub fn fail(&self, msg: &str) -> FlushHandle {
        self.write_opts(&style::fail(msg), true, FAST_DELAY)
    }

    pub fn critical_success(&self) -> FlushHandle {
        self.success("CRITICAL SUCCESS")
    }

    pub fn critical_fail(&self) -> FlushHandle {
        self.fail("CRITICAL FAIL")
    }

    /// `OK`-tagged informational line.
    pub fn ok(&self, msg: &str) -> FlushHandle {
        self.write(&format!("{} {msg}", style::success("OK")))
    }

    /// `ERR`-tagged informational line.
    pub fn error(&self, msg: &str) -> FlushHandle {
        self.write(&format!("{} {msg}", style::fail("ERR")))
    }

    /// Lay out short labels in aligned columns sized to the terminal, the way
    /// a shell renders tab-completion candidates. An empty entry starts a new
    /// group separated by a blank line. Falls back to a single column when
    /// the terminal is narrower than the widest label.
    pub fn write_table(&self, items: &[String]) -> FlushHandle {
        if items.is_empty() {
            return self.flushed();
        }

        let width = items.iter().map(|s| s.chars().count()).max().unwrap_or(0) + 2;
        let columns = self.columns().unwrap_or_else(terminal_columns);
        let max_columns = (columns / width).max(1);

        let mut group: Vec<&String> = Vec::new();
        for item in items {
            if item.is_empty() {
                self.write_group(&group, width, max_columns);
                group.clear();
            } else {
                group.push(item);
            }
        }
        self.write_group(&group, width, max_columns);
        self.flushed()
    }

    fn write_group(&self, group: &[&String], width: usize, max_columns: usize) {
        if group.is_empty() {
            return;
        }

        let rows = group.len().div_ceil(max_columns);
        for row in 0..rows {
            for col in 0..max_columns {
                let idx = row * max_columns + col;
                let Some(item) = group.get(idx) else { break };
                self.write_opts(item, false, TABLE_DELAY);
                if col < max_columns - 1 {
                    let pad = width - item.chars().count();
                    self.write_opts(&" ".repeat(pad), false, TABLE_DELAY);
                }
            }
            self.write_opts("", true, TABLE_DELAY);
        }
        self.write_opts("", true, TABLE_DELAY);
    }

    fn columns(&self) -> Option<usize> {
        self.inner.lock().unwrap().columns
    }

    fn spawn_drain(&self, delay: Duration, tx: oneshot::Sender<()>) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            loop {
                let emitted = {
                    let mut g = inner.lock().unwrap();
                    let len = unit_len(&g.buf[g.cursor..]);
                    if len == 0 {
                        g.buf.clear();
                        g.cursor = 0;
                        g.pending = None;
                        false
                    } else {
                        let end = g.cursor + len;
                        let range = g.cursor..end;
                        g.cursor = end;
                        let bytes = g.buf[range].to_string();
                        let _ = g.sink.write_all(bytes.as_bytes());
                        let _ = g.sink.flush();
                        true
                    }
                };
                if !emitted {
                    break;
                }
                sleep(delay).await;
            }
            let _ = tx.send(());
        });
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte length of the next emission unit: one character, or a whole ANSI
/// escape sequence so styling never tears mid-sequence.
fn unit_len(rest: &str) -> usize {
    let mut chars = rest.chars();
    let Some(first) = chars.next() else { return 0 };
    if first != '\x1b' {
        return first.len_utf8();
    }

    let mut len = first.len_utf8();
    for c in chars {
        len += c.len_utf8();
        if c.is_ascii_alphabetic() {
            break;
        }
    }
    len
}

fn terminal_columns() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
}
