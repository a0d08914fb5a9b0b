use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::error::{map_console_io, map_discard_open};
use crate::AlexError;

/// Destination for output produced while the console is suppressed. Opened once
/// and reused for every trial run.
#[derive(Debug)]
pub enum DiscardSink {
    Null(io::Sink),
    File(File),
}

impl DiscardSink {
    pub fn null() -> Self {
        Self::Null(io::sink())
    }

    pub fn open(path: &Path) -> Result<Self, AlexError> {
        File::create(path)
            .map(Self::File)
            .map_err(map_discard_open)
    }
}

impl Write for DiscardSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Null(sink) => sink.write(buf),
            Self::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Null(sink) => sink.flush(),
            Self::File(file) => file.flush(),
        }
    }
}

/// In-memory writer that can be cloned and read back, for embedding hosts that
/// want to capture session output.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer(Rc<RefCell<Vec<u8>>>);

impl CaptureBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct ConsoleState {
    visible: Box<dyn Write>,
    discard: DiscardSink,
    suppress_depth: usize,
    discarded_bytes: u64,
    failure: Option<io::Error>,
}

impl ConsoleState {
    fn write_all(&mut self, text: &[u8]) -> io::Result<()> {
        if self.suppress_depth > 0 {
            self.discarded_bytes += text.len() as u64;
            self.discard.write_all(text)
        } else {
            self.visible.write_all(text)?;
            self.visible.flush()
        }
    }
}

/// The output stream shared by the session and the evaluator. Everything the
/// evaluated code prints goes through here, so swapping the active target is
/// enough to silence a trial run.
#[derive(Clone)]
pub struct Console {
    state: Rc<RefCell<ConsoleState>>,
}

impl Console {
    pub fn new(visible: Box<dyn Write>, discard: DiscardSink) -> Self {
        Self {
            state: Rc::new(RefCell::new(ConsoleState {
                visible,
                discard,
                suppress_depth: 0,
                discarded_bytes: 0,
                failure: None,
            })),
        }
    }

    pub fn stdout(discard_path: Option<&Path>) -> Result<Self, AlexError> {
        let discard = match discard_path {
            Some(path) => DiscardSink::open(path)?,
            None => DiscardSink::null(),
        };
        Ok(Self::new(Box::new(io::stdout()), discard))
    }

    pub fn capture() -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        (
            Self::new(Box::new(buffer.clone()), DiscardSink::null()),
            buffer,
        )
    }

    pub fn write_text(&self, text: &str) -> Result<(), AlexError> {
        self.state
            .borrow_mut()
            .write_all(text.as_bytes())
            .map_err(map_console_io)
    }

    pub fn write_line(&self, text: &str) -> Result<(), AlexError> {
        self.write_text(&format!("{}\n", text))
    }

    /// Output coming from inside an evaluation cannot return an error to the
    /// script, so the first failure is latched for `take_failure`.
    pub fn script_output(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        let line = format!("{}\n", text);
        if let Err(error) = state.write_all(line.as_bytes()) {
            tracing::error!("console write failed: {}", error);
            state.failure.get_or_insert(error);
        }
    }

    pub fn take_failure(&self) -> Option<AlexError> {
        self.state.borrow_mut().failure.take().map(map_console_io)
    }

    pub fn clear_screen(&self) -> Result<(), AlexError> {
        let mut sequence = Vec::new();
        queue!(sequence, Clear(ClearType::All), MoveTo(0, 0)).map_err(map_console_io)?;
        self.state
            .borrow_mut()
            .write_all(&sequence)
            .map_err(map_console_io)
    }

    /// Routes all output to the discard sink until the returned guard drops.
    pub fn suppress(&self) -> Suppressed {
        self.state.borrow_mut().suppress_depth += 1;
        Suppressed {
            state: Rc::clone(&self.state),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.state.borrow().suppress_depth > 0
    }

    pub fn discarded_bytes(&self) -> u64 {
        self.state.borrow().discarded_bytes
    }
}

#[must_use = "output is only suppressed while the guard is alive"]
pub struct Suppressed {
    state: Rc<RefCell<ConsoleState>>,
}

impl Drop for Suppressed {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.suppress_depth = state.suppress_depth.saturating_sub(1);
    }
}
