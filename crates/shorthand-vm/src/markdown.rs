//! Markdown to HTML.

use pulldown_cmark::{html, Options, Parser};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
}

/// Render CommonMark (plus tables, strikethrough, footnotes, task lists).
pub fn markdown_to_html(src: &str) -> String {
    let parser = Parser::new_ext(src, options());
    let mut out = String::with_capacity(src.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
