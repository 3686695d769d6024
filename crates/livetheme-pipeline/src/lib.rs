//! Style-pipeline rewriting and theme injection for livetheme.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate is the integration half of livetheme. Given a host build
//! framework's style rules, it rewrites every Less-matching rule so a
//! synthesized block of theme-variable overrides is prepended to each
//! compiled file, and splices a runtime theme-switch shim into the
//! produced entry asset.
//!
//! The host drives it at two lifecycle points:
//!
//! - "environment ready": call [`rewrite_style_rules`] on the full rule
//!   list and apply the returned list;
//! - "assets ready": call [`inject_runtime_script`] on the produced
//!   assets.
//!
//! Variable extraction itself lives in `livetheme-less`.

mod assets;
mod block;
mod config;
mod error;
mod prepend;
mod rewrite;
mod rule;

pub use assets::inject_runtime_script;
pub use block::synthesize_override_block;
pub use config::ThemeConfig;
pub use error::PipelineError;
pub use prepend::{PrependHook, splice_after_imports};
pub use rewrite::{VAR_LOADER_ID, rewrite_style_rules};
pub use rule::{
    AdditionalData, CompileContext, ContentHook, LoaderInvocation, LoaderOptions, LoaderStep,
    PipelineRule, RuleMatcher, RuleSteps,
};
