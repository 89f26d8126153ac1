//! Line shortcuts expanded when return is pressed.
//!
//! A line starting with one of the prefixes below loses the prefix and the
//! rest of the line takes the associated style:
//!
//! | prefix | style        |
//! |--------|--------------|
//! | `# `   | `header-one` |
//! | `* `   | `BOLD`       |
//! | `** `  | `RED`        |
//! | `*** ` | `UNDERLINE`  |
//!
//! Every other line just gets a plain line break. In both cases the new
//! line starts with an empty inline style so it does not inherit the style
//! of the line above.

use crate::editing::{Cmd, Document, InlineStyle, StyleSet};

/// Literal line prefix and the style it turns into
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutRule {
    pub prefix: &'static str,
    pub style: InlineStyle,
}

impl ShortcutRule {
    /// The prefix marker without its trailing space
    pub fn marker(&self) -> &'static str {
        self.prefix.trim_end()
    }

    /// Drop the marker and any whitespace after it
    fn strip<'a>(&self, text: &'a str) -> &'a str {
        text[self.marker().len()..].trim_start()
    }
}

/// Rules in their declared order
pub static SHORTCUT_RULES: [ShortcutRule; 4] = [
    ShortcutRule {
        prefix: "# ",
        style: InlineStyle::HeaderOne,
    },
    ShortcutRule {
        prefix: "* ",
        style: InlineStyle::Bold,
    },
    ShortcutRule {
        prefix: "** ",
        style: InlineStyle::Red,
    },
    ShortcutRule {
        prefix: "*** ",
        style: InlineStyle::Underline,
    },
];

/// Rules ordered by descending prefix length.
///
/// Each prefix ends in a space so none is a prefix of another and the
/// order cannot change which rule fires. Testing the most specific prefix
/// first keeps that true if a rule without the trailing space is added.
pub fn rules_longest_first() -> Vec<&'static ShortcutRule> {
    let mut rules: Vec<&'static ShortcutRule> = SHORTCUT_RULES.iter().collect();
    rules.sort_by_key(|rule| std::cmp::Reverse(rule.prefix.len()));
    rules
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutMatch<'a> {
    pub rule: &'static ShortcutRule,
    /// Line text with the prefix removed
    pub remainder: &'a str,
}

/// First rule whose prefix starts `text`, longest prefix first
pub fn match_shortcut(text: &str) -> Option<ShortcutMatch<'_>> {
    rules_longest_first().into_iter().find_map(|rule| {
        text.starts_with(rule.prefix).then(|| ShortcutMatch {
            rule,
            remainder: rule.strip(text),
        })
    })
}

/// What the return key does to the document, as commands to apply in order
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPlan {
    /// Rule that fired, if the current line had a shortcut prefix
    pub rule: Option<&'static ShortcutRule>,
    pub commands: Vec<Cmd>,
}

/// Work out the return key's effect on the line holding the selection start.
///
/// A matching line is restyled in one step, then split; any line is
/// followed by a reset of the inline style override.
pub fn plan_return(doc: &Document) -> ReturnPlan {
    let block = doc.current_block();
    let mut commands = Vec::new();

    let rule = match_shortcut(block.text()).map(|found| {
        log::debug!(
            "line shortcut {:?} on block {} -> {}",
            found.rule.prefix,
            block.key(),
            found.rule.style
        );
        commands.push(Cmd::ReplaceBlockText {
            key: block.key().clone(),
            text: found.remainder.to_string(),
            style: doc.current_inline_style().with(found.rule.style.clone()),
        });
        found.rule
    });

    commands.push(Cmd::SplitBlock);
    commands.push(Cmd::SetInlineStyleOverride(StyleSet::new()));

    ReturnPlan { rule, commands }
}
