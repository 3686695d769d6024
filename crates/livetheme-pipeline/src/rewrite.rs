//! Loader-chain rewriting.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Rewrites the host's style rules so that theme variables are injected
//! ahead of the user's own stylesheet content on every compile of every
//! Less file:
//!
//! 1. a variable-injection step is inserted ahead of the terminal
//!    compiler step, and
//! 2. the terminal compiler step is wrapped so the override block is
//!    prepended (import-aware) to the content it is about to process.
//!
//! The rewrite is a pure function over the rule list: the host applies
//! the returned list at its "environment ready" stage, before any
//! compile work begins, so no locking is ever needed.

use std::sync::Arc;

use crate::config::ThemeConfig;
use crate::prepend::PrependHook;
use crate::rule::{
    AdditionalData, LoaderInvocation, LoaderOptions, LoaderStep, PipelineRule, RuleMatcher,
    RuleSteps,
};

/// Identifier of the injected variable-loader step. The idempotency guard
/// scans chains for a loader name containing this substring.
pub const VAR_LOADER_ID: &str = "livetheme-variable-loader";

/// Fixed sentinel filename used to test whether a rule's pattern matcher
/// targets Less files.
const LESS_SENTINEL: &str = "probe.less";

/// Rewrite every Less-matching rule in `rules` for theme injection.
///
/// A rule qualifies only if its matcher is a [`RuleMatcher::Pattern`]
/// whose pattern matches a `.less` filename; rules matched by raw path or
/// predicate, and rules whose steps the rewriter cannot safely interpret,
/// pass through untouched. Applying the rewrite twice is a no-op the
/// second time.
pub fn rewrite_style_rules(rules: Vec<PipelineRule>, config: &ThemeConfig) -> Vec<PipelineRule> {
    let mut rewritten = 0usize;
    let rules: Vec<PipelineRule> = rules
        .into_iter()
        .map(|rule| {
            let (rule, changed) = rewrite_rule(rule, config);
            if changed {
                rewritten += 1;
            }
            rule
        })
        .collect();
    tracing::debug!(total = rules.len(), rewritten, "Rewrote style rules");
    rules
}

fn rule_qualifies(rule: &PipelineRule) -> bool {
    match &rule.test {
        RuleMatcher::Pattern(regex) => regex.is_match(LESS_SENTINEL),
        _ => false,
    }
}

fn rewrite_rule(mut rule: PipelineRule, config: &ThemeConfig) -> (PipelineRule, bool) {
    if !rule_qualifies(&rule) {
        return (rule, false);
    }

    let (steps, changed) = match rule.steps {
        // Shorthand: the single string names the terminal compiler step
        RuleSteps::Single(name) => {
            let wrapped = wrap_loader(name, LoaderOptions::default(), config);
            (RuleSteps::Chain(vec![injected_step(), wrapped]), true)
        }
        // Not a step sequence: cannot safely rewrite
        RuleSteps::Opaque => (RuleSteps::Opaque, false),
        RuleSteps::Chain(mut steps) => {
            let already_injected = steps
                .iter()
                .any(|s| s.loader_name().is_some_and(|n| n.contains(VAR_LOADER_ID)));
            if already_injected {
                (RuleSteps::Chain(steps), false)
            } else {
                match steps.pop() {
                    None => (RuleSteps::Chain(steps), false),
                    // A callback terminal step has no loader reference or
                    // options to preserve: leave the rule untouched
                    Some(last @ LoaderStep::Callback(_)) => {
                        steps.push(last);
                        (RuleSteps::Chain(steps), false)
                    }
                    Some(last) => {
                        let (loader, options) = match last {
                            LoaderStep::Name(name) => (name, LoaderOptions::default()),
                            LoaderStep::Invocation(inv) => (inv.loader, inv.options),
                            LoaderStep::Callback(_) => unreachable!("handled above"),
                        };
                        steps.push(injected_step());
                        steps.push(wrap_loader(loader, options, config));
                        (RuleSteps::Chain(steps), true)
                    }
                }
            }
        }
    };

    rule.steps = steps;
    (rule, changed)
}

/// The injected first-class step that runs ahead of the terminal
/// compiler step.
fn injected_step() -> LoaderStep {
    LoaderStep::Name(VAR_LOADER_ID.to_string())
}

/// Wrap a terminal compiler step: same loader, same options, except that
/// `additional_data` becomes a [`PrependHook`] composed with whatever
/// prepend option was already there.
fn wrap_loader(loader: String, options: LoaderOptions, config: &ThemeConfig) -> LoaderStep {
    let hook = PrependHook::new(config.clone(), options.additional_data);
    LoaderStep::Invocation(LoaderInvocation {
        loader,
        options: LoaderOptions {
            additional_data: Some(AdditionalData::Hook(Arc::new(hook))),
            extra: options.extra,
        },
    })
}
