//! Print handler for configurable output.
//!
//! The kernel `puts`/`print` functions write through a handler so tests can
//! capture output without touching process stdout. Enum dispatch, not trait
//! objects.

use std::rc::Rc;

use parking_lot::Mutex;

/// Print handler implementation.
pub enum PrintHandlerImpl {
    /// Writes to stdout (default).
    Stdout,
    /// Captures to a buffer (testing).
    Buffer(Mutex<String>),
}

impl PrintHandlerImpl {
    /// Print a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
        }
    }

    /// Print without newline.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout => print!("{msg}"),
            Self::Buffer(buf) => buf.lock().push_str(msg),
        }
    }

    /// Get all captured output. Empty for the stdout handler.
    pub fn get_output(&self) -> String {
        match self {
            Self::Stdout => String::new(),
            Self::Buffer(buf) => buf.lock().clone(),
        }
    }

    /// Clear captured output.
    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// Shared print handler handle.
pub type SharedPrintHandler = Rc<PrintHandlerImpl>;

/// Create a stdout print handler.
pub fn stdout_handler() -> SharedPrintHandler {
    Rc::new(PrintHandlerImpl::Stdout)
}

/// Create a capturing buffer print handler.
pub fn buffer_handler() -> SharedPrintHandler {
    Rc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_lines() {
        let handler = buffer_handler();
        handler.println("hello");
        handler.print("wo");
        handler.print("rld");
        assert_eq!(handler.get_output(), "hello\nworld");
        handler.clear();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn stdout_does_not_capture() {
        let handler = stdout_handler();
        assert_eq!(handler.get_output(), "");
    }
}
