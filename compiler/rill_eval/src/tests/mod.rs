//! Scenario and invariant test suites.
//!
//! These suites build programs through `rill_ir::ExprArena` the way the
//! parser collaborator would, then drive them through a full interpreter.

mod support;

mod invariant_tests;
