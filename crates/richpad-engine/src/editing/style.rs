use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named inline style carried by individual characters.
///
/// The names are the ones written to storage, so `HeaderOne` serializes as
/// `header-one` while the toolbar styles use upper case. Names this editor
/// does not know about survive a load/save cycle through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Code,
    Red,
    HeaderOne,
    Other(String),
}

impl InlineStyle {
    pub fn name(&self) -> &str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Italic => "ITALIC",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Code => "CODE",
            InlineStyle::Red => "RED",
            InlineStyle::HeaderOne => "header-one",
            InlineStyle::Other(name) => name,
        }
    }
}

impl From<&str> for InlineStyle {
    fn from(name: &str) -> Self {
        match name {
            "BOLD" => InlineStyle::Bold,
            "ITALIC" => InlineStyle::Italic,
            "UNDERLINE" => InlineStyle::Underline,
            "CODE" => InlineStyle::Code,
            "RED" => InlineStyle::Red,
            "header-one" => InlineStyle::HeaderOne,
            other => InlineStyle::Other(other.to_string()),
        }
    }
}

impl From<String> for InlineStyle {
    fn from(name: String) -> Self {
        InlineStyle::from(name.as_str())
    }
}

impl From<InlineStyle> for String {
    fn from(style: InlineStyle) -> Self {
        style.name().to_string()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of inline styles applied to one character (or to the
/// characters about to be typed, when used as an override).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleSet(BTreeSet<InlineStyle>);

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, style: &InlineStyle) -> bool {
        self.0.contains(style)
    }

    pub fn insert(&mut self, style: InlineStyle) -> bool {
        self.0.insert(style)
    }

    pub fn remove(&mut self, style: &InlineStyle) -> bool {
        self.0.remove(style)
    }

    /// Copy of this set with `style` added
    pub fn with(&self, style: InlineStyle) -> Self {
        let mut set = self.clone();
        set.insert(style);
        set
    }

    /// Copy of this set with `style` toggled
    pub fn toggled(&self, style: &InlineStyle) -> Self {
        let mut set = self.clone();
        if !set.remove(style) {
            set.insert(style.clone());
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &InlineStyle> {
        self.0.iter()
    }
}

impl FromIterator<InlineStyle> for StyleSet {
    fn from_iter<I: IntoIterator<Item = InlineStyle>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StyleSet {
    type Item = &'a InlineStyle;
    type IntoIter = std::collections::btree_set::Iter<'a, InlineStyle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoration {
    None,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Proportional,
    Monospace,
}

/// Concrete visual properties for a style. Unset fields inherit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisualStyle {
    pub color: Option<Rgb>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub font_family: Option<FontFamily>,
    /// Relative font size, `2.0` meaning twice the body size
    pub font_size_em: Option<f32>,
}

impl VisualStyle {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: &VisualStyle) -> VisualStyle {
        VisualStyle {
            color: other.color.or(self.color),
            font_weight: other.font_weight.or(self.font_weight),
            font_style: other.font_style.or(self.font_style),
            text_decoration: other.text_decoration.or(self.text_decoration),
            font_family: other.font_family.or(self.font_family),
            font_size_em: other.font_size_em.or(self.font_size_em),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == Some(FontWeight::Bold)
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == Some(FontStyle::Italic)
    }

    pub fn is_underlined(&self) -> bool {
        self.text_decoration == Some(TextDecoration::Underline)
    }

    pub fn is_monospace(&self) -> bool {
        self.font_family == Some(FontFamily::Monospace)
    }
}

/// Mapping from style names to how they look
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMap {
    entries: BTreeMap<InlineStyle, VisualStyle>,
}

impl Default for StyleMap {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            InlineStyle::Bold,
            VisualStyle {
                font_weight: Some(FontWeight::Bold),
                ..VisualStyle::default()
            },
        );
        entries.insert(
            InlineStyle::Italic,
            VisualStyle {
                font_style: Some(FontStyle::Italic),
                ..VisualStyle::default()
            },
        );
        entries.insert(
            InlineStyle::Underline,
            VisualStyle {
                text_decoration: Some(TextDecoration::Underline),
                ..VisualStyle::default()
            },
        );
        entries.insert(
            InlineStyle::Code,
            VisualStyle {
                font_family: Some(FontFamily::Monospace),
                ..VisualStyle::default()
            },
        );
        entries.insert(
            InlineStyle::Red,
            VisualStyle {
                color: Some(Rgb::RED),
                ..VisualStyle::default()
            },
        );
        entries.insert(
            InlineStyle::HeaderOne,
            VisualStyle {
                font_weight: Some(FontWeight::Bold),
                font_size_em: Some(2.0),
                ..VisualStyle::default()
            },
        );
        Self { entries }
    }
}

impl StyleMap {
    pub fn get(&self, style: &InlineStyle) -> Option<&VisualStyle> {
        self.entries.get(style)
    }

    pub fn insert(&mut self, style: InlineStyle, visual: VisualStyle) {
        self.entries.insert(style, visual);
    }

    /// Combined look of a set of styles. Styles without an entry contribute
    /// nothing.
    pub fn resolve(&self, styles: &StyleSet) -> VisualStyle {
        styles
            .iter()
            .filter_map(|style| self.entries.get(style))
            .fold(VisualStyle::default(), |acc, visual| acc.merge(visual))
    }
}
