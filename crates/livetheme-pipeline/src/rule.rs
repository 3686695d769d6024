//! Build-pipeline rule model.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! An explicit model of the host build framework's style rules, shaped so
//! the rewriter can reason about them without aliasing into the host's
//! own structures. The host hands its rule list to
//! [`crate::rewrite_style_rules`] at its "environment ready" stage and
//! applies the returned list.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::error::PipelineError;

/// Per-compile context handed to content hooks.
#[derive(Debug, Clone)]
pub struct CompileContext {
    /// The stylesheet file being compiled
    pub file: PathBuf,
}

impl CompileContext {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        CompileContext { file: file.into() }
    }
}

/// An async content-rewriting hook run before a loader processes a file.
///
/// Hooks receive the content a loader is about to process and return the
/// content it should process instead. They must be side-effect-free beyond
/// returning the transformed string.
#[async_trait]
pub trait ContentHook: Send + Sync {
    async fn rewrite(
        &self,
        content: String,
        ctx: &CompileContext,
    ) -> Result<String, PipelineError>;
}

/// The "additional prepended content" option of a loader step: either a
/// literal text prefix or an async hook.
#[derive(Clone)]
pub enum AdditionalData {
    Text(String),
    Hook(Arc<dyn ContentHook>),
}

impl fmt::Debug for AdditionalData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdditionalData::Text(text) => f.debug_tuple("Text").field(text).finish(),
            AdditionalData::Hook(_) => f.debug_tuple("Hook").field(&"<hook>").finish(),
        }
    }
}

/// Options attached to a loader invocation.
///
/// `additional_data` is the only option the rewriter understands; every
/// other option is passed through untouched in `extra`.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub additional_data: Option<AdditionalData>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A loader reference plus its options.
#[derive(Debug, Clone)]
pub struct LoaderInvocation {
    pub loader: String,
    pub options: LoaderOptions,
}

/// One step in a rule's processing chain.
#[derive(Clone)]
pub enum LoaderStep {
    /// Bare loader reference, default options
    Name(String),
    /// Loader reference with options
    Invocation(LoaderInvocation),
    /// Inline function step supplied by the host
    Callback(Arc<dyn ContentHook>),
}

impl LoaderStep {
    /// Loader name of this step, if it has one. Callback steps don't.
    pub fn loader_name(&self) -> Option<&str> {
        match self {
            LoaderStep::Name(name) => Some(name),
            LoaderStep::Invocation(inv) => Some(&inv.loader),
            LoaderStep::Callback(_) => None,
        }
    }
}

impl fmt::Debug for LoaderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderStep::Name(name) => f.debug_tuple("Name").field(name).finish(),
            LoaderStep::Invocation(inv) => f.debug_tuple("Invocation").field(inv).finish(),
            LoaderStep::Callback(_) => f.debug_tuple("Callback").field(&"<hook>").finish(),
        }
    }
}

/// A rule's file matcher.
///
/// Only the `Pattern` variant participates in rewrite selection; rules
/// matched by raw path or by host-supplied predicate are never rewritten.
#[derive(Clone)]
pub enum RuleMatcher {
    /// Pattern-matching test, e.g. `\.less$`
    Pattern(Regex),
    /// Literal path or path fragment
    Path(String),
    /// Host-supplied predicate
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl RuleMatcher {
    pub fn matches(&self, filename: &str) -> bool {
        match self {
            RuleMatcher::Pattern(regex) => regex.is_match(filename),
            RuleMatcher::Path(path) => filename.contains(path.as_str()),
            RuleMatcher::Predicate(test) => test(filename),
        }
    }
}

impl fmt::Debug for RuleMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleMatcher::Pattern(regex) => f.debug_tuple("Pattern").field(regex).finish(),
            RuleMatcher::Path(path) => f.debug_tuple("Path").field(path).finish(),
            RuleMatcher::Predicate(_) => f.debug_tuple("Predicate").field(&"<fn>").finish(),
        }
    }
}

/// A style-processing rule: a file matcher plus an ordered step chain.
///
/// By pipeline convention the *last* step in a chain is the terminal
/// compiler step, closest to final output.
#[derive(Debug, Clone)]
pub struct PipelineRule {
    pub test: RuleMatcher,
    pub steps: RuleSteps,
}

/// The step sequence of a rule, in the three shapes hosts express it.
#[derive(Debug, Clone)]
pub enum RuleSteps {
    /// Shorthand: a single string naming the terminal compiler step
    Single(String),
    /// Ordered chain of steps
    Chain(Vec<LoaderStep>),
    /// Anything the rewriter cannot safely interpret
    Opaque,
}
