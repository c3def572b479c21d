//! # tokenlint_rule
//!
//! Rule protocol for tokenlint.
//!
//! This crate provides:
//! - The [`RuleModule`] trait and its metadata
//! - Per-document [`Listeners`] and run-level [`RunHandler`] hooks
//! - Reporting ([`Reporter`], [`Report`]) and the resulting
//!   [`LintMessage`] / [`LintResult`] types
//! - The [`Dispatcher`] that routes syntax events to rules
//! - The [`RuleRegistry`], which merges built-in and plugin rules and
//!   rejects name collisions
//!
//! ## Lifecycle
//!
//! For every document, each active rule's `create` returns handlers keyed
//! by [`EventKind`](tokenlint_ast::EventKind); a parsing strategy then
//! emits events into a [`Dispatcher`] that calls them. Once every document
//! is done, each rule's `create_run` hook fires exactly once.

mod context;
mod diagnostic;
mod dispatch;
mod error;
mod meta;
mod module;
mod registry;

pub use context::{DocumentInfo, Report, Reporter, RuleContext, RunContext, TokenUsage};
pub use diagnostic::{Fix, LintMessage, LintResult, Severity};
pub use dispatch::Dispatcher;
pub use error::RuleError;
pub use meta::{Capabilities, RuleMeta};
pub use module::{Handler, Listeners, RuleModule, RunHandler};
pub use registry::{BUILTIN, Plugin, RuleRegistry};
