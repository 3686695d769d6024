//! Content-prepend hook for the terminal compiler step.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Runs right before the terminal Less compiler step processes a file:
//! synthesizes the override block, applies whatever prepend behavior the
//! user had already configured, and splices the block in so that it never
//! precedes an `@import` directive (which would be invalid placement) but
//! still applies to everything that follows.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use async_trait::async_trait;

use crate::block::synthesize_override_block;
use crate::config::ThemeConfig;
use crate::error::PipelineError;
use crate::rule::{AdditionalData, CompileContext, ContentHook};

/// An `@import …;` directive, up to and including its semicolon.
///
/// Purely textual: once the content is known to lead with an import,
/// this also fires on `@import` text inside comments or string literals
/// further down. Theme entry files don't carry such text in practice,
/// and an extra copy of the block after one is harmless.
static IMPORT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@import\s+[^;]+;").unwrap());

/// A leading import *directive*: `@import` followed by whitespace, so a
/// variable whose name merely starts with "import" (`@important-color:`)
/// does not count.
static LEADING_IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@import\s").unwrap());

/// The hook installed as the wrapped terminal step's `additional_data`.
///
/// Composes with the prepend option the step already had: the user's own
/// prepend still runs, and the override block is layered outside it.
pub struct PrependHook {
    config: ThemeConfig,
    original: Option<AdditionalData>,
}

impl PrependHook {
    pub fn new(config: ThemeConfig, original: Option<AdditionalData>) -> Self {
        PrependHook { config, original }
    }
}

#[async_trait]
impl ContentHook for PrependHook {
    async fn rewrite(
        &self,
        content: String,
        ctx: &CompileContext,
    ) -> Result<String, PipelineError> {
        // Recomputed fresh on every compile; a broken theme file fails
        // this compile rather than shipping an unthemed asset.
        let block = synthesize_override_block(&self.config).await?;

        let combined = match &self.original {
            None => content,
            Some(AdditionalData::Text(text)) => format!("{text}{content}"),
            Some(AdditionalData::Hook(hook)) => hook.rewrite(content, ctx).await?,
        };

        Ok(splice_after_imports(&combined, &block))
    }
}

/// Insert `block` into `content` without displacing `@import` directives.
///
/// If the content (ignoring leading whitespace) begins with an `@import`
/// directive, the block is inserted immediately after *every* import
/// directive found, preserving each import verbatim and in order.
/// Otherwise the block is simply prepended.
pub fn splice_after_imports(content: &str, block: &str) -> String {
    if LEADING_IMPORT.is_match(content.trim_start()) {
        IMPORT_DIRECTIVE
            .replace_all(content, |caps: &Captures<'_>| format!("{}{block}", &caps[0]))
            .into_owned()
    } else {
        format!("{block}{content}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn theme_dir(dark: &str, light: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dark.less"), dark).unwrap();
        fs::write(dir.path().join("light.less"), light).unwrap();
        dir
    }

    fn ctx() -> CompileContext {
        CompileContext::new("src/styles/index.less")
    }

    #[test]
    fn test_splice_no_import_prepends_block() {
        let out = splice_after_imports(".foo{color:red}", "<block>");
        assert_eq!(out, "<block>.foo{color:red}");
    }

    #[test]
    fn test_splice_after_every_import() {
        let content = "@import 'a.less';@import 'b.less';.foo{color:red}";
        let out = splice_after_imports(content, "<block>");
        assert_eq!(
            out,
            "@import 'a.less';<block>@import 'b.less';<block>.foo{color:red}"
        );
    }

    #[test]
    fn test_splice_imports_preserved_verbatim_in_order() {
        let content = "@import 'a.less';@import 'b.less';.foo{color:red}";
        let out = splice_after_imports(content, "<block>");
        let a = out.find("@import 'a.less';").unwrap();
        let b = out.find("@import 'b.less';").unwrap();
        let block = out.find("<block>").unwrap();
        assert!(a < b);
        assert!(a < block, "block must never precede an import");
    }

    #[test]
    fn test_splice_leading_whitespace_before_import() {
        let content = "\n  @import 'a.less';\n.foo{}";
        let out = splice_after_imports(content, "<b>");
        assert_eq!(out, "\n  @import 'a.less';<b>\n.foo{}");
    }

    #[test]
    fn test_splice_variable_named_like_import_still_prepends() {
        // "@important-color" shares a prefix with "@import" but is not an
        // import directive: the block must be prepended, never dropped
        let out = splice_after_imports("@important-color: red;.foo{}", "<block>");
        assert_eq!(out, "<block>@important-color: red;.foo{}");
    }

    #[test]
    fn test_splice_empty_block_leaves_content() {
        assert_eq!(splice_after_imports(".foo{}", ""), ".foo{}");
    }

    #[tokio::test]
    async fn test_hook_prepends_block_to_plain_content() {
        let dir = theme_dir("@primary-color: red;\n", "");
        let hook = PrependHook::new(ThemeConfig::new(dir.path()), None);

        let out = hook.rewrite(".foo{color:red}".to_string(), &ctx()).await.unwrap();
        assert_eq!(
            out,
            "@primary-color:~'var(--antd-theme-primary-color)';.foo{color:red}"
        );
    }

    #[tokio::test]
    async fn test_hook_composes_with_original_text() {
        let dir = theme_dir("@a: 1;\n", "");
        let original = Some(AdditionalData::Text("@user-extra: 2;".to_string()));
        let hook = PrependHook::new(ThemeConfig::new(dir.path()), original);

        let out = hook.rewrite(".foo{}".to_string(), &ctx()).await.unwrap();
        // theme block first, then the user's prepend, then the content
        assert_eq!(out, "@a:~'var(--antd-theme-a)';@user-extra: 2;.foo{}");
    }

    #[tokio::test]
    async fn test_hook_composes_with_original_hook() {
        struct Upper;
        #[async_trait]
        impl ContentHook for Upper {
            async fn rewrite(
                &self,
                content: String,
                _ctx: &CompileContext,
            ) -> Result<String, PipelineError> {
                Ok(content.to_uppercase())
            }
        }

        let dir = theme_dir("@a: 1;\n", "");
        let original = Some(AdditionalData::Hook(Arc::new(Upper)));
        let hook = PrependHook::new(ThemeConfig::new(dir.path()), original);

        let out = hook.rewrite(".foo{}".to_string(), &ctx()).await.unwrap();
        assert_eq!(out, "@a:~'var(--antd-theme-a)';.FOO{}");
    }

    #[tokio::test]
    async fn test_hook_inserts_after_imports() {
        let dir = theme_dir("@a: 1;\n", "");
        let hook = PrependHook::new(ThemeConfig::new(dir.path()), None);

        let content = "@import 'base.less';.foo{}".to_string();
        let out = hook.rewrite(content, &ctx()).await.unwrap();
        assert_eq!(out, "@import 'base.less';@a:~'var(--antd-theme-a)';.foo{}");
    }

    #[tokio::test]
    async fn test_hook_propagates_extraction_failure() {
        let dir = TempDir::new().unwrap(); // no theme files at all
        let hook = PrependHook::new(ThemeConfig::new(dir.path()), None);

        let result = hook.rewrite(".foo{}".to_string(), &ctx()).await;
        assert!(matches!(result, Err(PipelineError::Theme(_))));
    }
}
