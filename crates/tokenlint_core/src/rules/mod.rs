//! Built-in rules.

mod colors;
mod deprecation;
mod duration;
pub(crate) mod literals;
mod no_inline_styles;
mod no_unused_tokens;
mod spacing;

pub use colors::Colors;
pub use deprecation::Deprecation;
pub use duration::Duration;
pub use no_inline_styles::NoInlineStyles;
pub use no_unused_tokens::NoUnusedTokens;
pub use spacing::Spacing;

use tokenlint_rule::RuleModule;

/// Returns a fresh instance of every built-in rule, in registration order.
pub fn builtin_rules() -> Vec<Box<dyn RuleModule>> {
    vec![
        Box::new(Colors::new()),
        Box::new(Spacing::new()),
        Box::new(Duration::new()),
        Box::new(Deprecation::new()),
        Box::new(NoInlineStyles::new()),
        Box::new(NoUnusedTokens::new()),
    ]
}
