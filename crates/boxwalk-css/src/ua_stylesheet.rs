//! User-Agent Stylesheet
//!
//! [CSS 2.1 Appendix D. Default style sheet for HTML 4](https://www.w3.org/TR/CSS2/sample.html)
//!
//! "This appendix is informative, and is to help CSS implementors write a
//! default style sheet for HTML 4."
//!
//! Box generation depends on these `display` values: a document with no
//! stylesheet of its own still gets block paragraphs, list items and table
//! structure from here. The lowest-priority origin in the cascade.

use std::sync::OnceLock;

use crate::stylesheet::{Stylesheet, parse_stylesheet};

/// Default rules, restricted to the supported-property catalog.
const UA_CSS: &str = r"
/* [D. Default style sheet] hidden elements */
head, script, style, title, meta, link, base, basefont, noembed, noframes,
param, area, datalist, template {
    display: none;
}

html, address, blockquote, body, dd, div, dl, dt, fieldset, form, frame,
frameset, h1, h2, h3, h4, h5, h6, noframes, ol, p, ul, center, dir, hr,
menu, pre, article, aside, footer, header, hgroup, main, nav, section,
figure, figcaption, details, summary {
    display: block;
}

li {
    display: list-item;
}

/* tables */
table {
    display: table;
}
tr {
    display: table-row;
}
thead {
    display: table-header-group;
}
tbody {
    display: table-row-group;
}
tfoot {
    display: table-footer-group;
}
col {
    display: table-column;
}
colgroup {
    display: table-column-group;
}
td, th {
    display: table-cell;
}
caption {
    display: table-caption;
    text-align: center;
}
th {
    font-weight: bold;
    text-align: center;
}

/* page */
body {
    margin: 8px;
}

h1 {
    font-size: 2em;
    margin: 0.67em 0;
}
h2 {
    font-size: 1.5em;
    margin: 0.75em 0;
}
h3 {
    font-size: 1.17em;
    margin: 0.83em 0;
}
h4, p, blockquote, ul, fieldset, form, ol, dl, dir, menu {
    margin: 1.12em 0;
}
h5 {
    font-size: 0.83em;
    margin: 1.5em 0;
}
h6 {
    font-size: 0.75em;
    margin: 1.67em 0;
}
h1, h2, h3, h4, h5, h6, b, strong {
    font-weight: bolder;
}

blockquote {
    margin-left: 40px;
    margin-right: 40px;
}
i, cite, em, var, address, dfn {
    font-style: italic;
}
pre {
    white-space: pre;
}
big {
    font-size: 1.17em;
}
small, sub, sup {
    font-size: 0.83em;
}
sub {
    vertical-align: sub;
}
sup {
    vertical-align: super;
}
s, strike, del {
    text-decoration: line-through;
}
u, ins {
    text-decoration: underline;
}
center {
    text-align: center;
}

/* lists */
ol, ul, dir, menu, dd {
    margin-left: 40px;
}
ol {
    list-style-type: decimal;
}
ol ul, ul ol, ul ul, ol ol {
    margin-top: 0;
    margin-bottom: 0;
}
";

/// Return the parsed UA stylesheet, parsing only once.
///
/// [CSS Cascading § 6.2](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
/// "User-agent origin: ... the lowest priority."
pub fn ua_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse_stylesheet(UA_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_parses() {
        // one rule per `{` in the source: nothing was dropped
        assert_eq!(ua_stylesheet().rules.len(), UA_CSS.matches('{').count());
        assert!(ua_stylesheet().rules.iter().all(|rule| !rule.declarations.is_empty()));
    }
}
