//! Keyword values of `display` and `visibility`
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::Serialize;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The single-keyword values of `display`. Box generation only distinguishes
/// `inline` from everything else, plus the keywords that generate no box.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Serialize, strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    /// "The element generates an inline box."
    Inline,
    /// "The element generates a block container box."
    Block,
    /// "The element generates a block box for the content and a separate
    /// list-item inline box."
    ListItem,
    /// "The element generates a run-in box."
    RunIn,
    /// "The element generates an inline-level block container."
    InlineBlock,
    /// [CSS 2.1 § 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display)
    Table,
    /// Inline-level table.
    InlineTable,
    /// "tbody"
    TableRowGroup,
    /// "thead"
    TableHeaderGroup,
    /// "tfoot"
    TableFooterGroup,
    /// "tr"
    TableRow,
    /// "colgroup"
    TableColumnGroup,
    /// "col"
    TableColumn,
    /// "td, th"
    TableCell,
    /// "caption"
    TableCaption,
    /// Block-level flex container.
    Flex,
    /// Inline-level flex container.
    InlineFlex,
    /// Block-level grid container.
    Grid,
    /// Inline-level grid container.
    InlineGrid,
    /// "The element generates a block container box, and lays out its
    /// contents using flow layout. It always establishes a new block
    /// formatting context for its contents."
    FlowRoot,
    /// "The element and its descendants generate no boxes or text runs."
    None,
}

impl Display {
    /// Whether an element with this display maps to a box at all. Table
    /// columns only carry styling for cells and generate nothing here.
    #[must_use]
    pub const fn generates_box(self) -> bool {
        !matches!(self, Self::None | Self::TableColumnGroup | Self::TableColumn)
    }

    /// Only `inline` maps to an inline box; every other box-generating value
    /// maps to a block box.
    #[must_use]
    pub const fn is_inline(self) -> bool {
        matches!(self, Self::Inline)
    }
}

/// [CSS 2.1 § 11.2 Visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Serialize, strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// "The generated box is visible."
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is drawn),
    /// but still affects layout."
    Hidden,
    /// "Used for dynamic row/column effects." Treated as `hidden` elsewhere.
    Collapse,
}

/// Used value of `visibility`: `collapse` folds into `hidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Serialize, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum UsedVisibility {
    /// Drawn.
    Visible,
    /// Not drawn.
    Hidden,
}

impl From<Visibility> for UsedVisibility {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Visible => Self::Visible,
            Visibility::Hidden | Visibility::Collapse => Self::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keywords_round_trip_kebab_case() {
        assert_eq!(Display::from_str("table-row-group").unwrap(), Display::TableRowGroup);
        assert_eq!(Display::from_str("LIST-ITEM").unwrap(), Display::ListItem);
        assert_eq!(Display::TableCell.to_string(), "table-cell");
        assert!(Display::from_str("contents").is_err());
    }

    #[test]
    fn test_generates_box() {
        assert!(!Display::None.generates_box());
        assert!(!Display::TableColumn.generates_box());
        assert!(!Display::TableColumnGroup.generates_box());
        assert!(Display::TableCell.generates_box());
    }

    #[test]
    fn test_collapse_is_hidden() {
        assert_eq!(UsedVisibility::from(Visibility::Collapse), UsedVisibility::Hidden);
        assert_eq!(UsedVisibility::from(Visibility::Visible).to_string(), "visible");
    }
}
