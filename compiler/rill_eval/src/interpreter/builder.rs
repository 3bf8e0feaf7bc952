//! `InterpreterBuilder` for constructing interpreters.

use rill_ir::SharedInterner;

use super::{Interpreter, SelectorNames};
use crate::environment::Environment;
use crate::natives::{self, Builtins};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Default call-depth limit.
///
/// Each language-level call consumes several host stack frames; this keeps
/// runaway recursion inside the host stack.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Builder for creating `Interpreter` instances.
pub struct InterpreterBuilder {
    interner: Option<SharedInterner>,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: usize,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            interner: None,
            print_handler: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Share an interner with the parser collaborator. A fresh interner is
    /// created when none is supplied.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Direct `puts`/`print` output. Default is stdout; tests use
    /// `buffer_handler()` to capture.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Cap the call depth.
    #[must_use]
    pub fn max_call_depth(mut self, limit: usize) -> Self {
        self.max_call_depth = limit;
        self
    }

    /// Build the interpreter: allocate the built-in classes into the kernel
    /// scope and install the native prelude on their instance scopes.
    pub fn build(self) -> Interpreter {
        let interner = self.interner.unwrap_or_default();
        let names = SelectorNames::new(&interner);
        let mut env = Environment::new();
        let builtins = Builtins::register(&interner, &mut env);

        let mut interp = Interpreter {
            interner,
            env,
            builtins,
            names,
            self_stack: Vec::new(),
            call_depth: 0,
            max_call_depth: self.max_call_depth,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
        };
        natives::install(&mut interp);
        interp
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
