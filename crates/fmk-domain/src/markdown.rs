//! Board configuration embedded in markdown notes as fenced code blocks.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// Bodies of every fenced block whose language is `identifier`, in note order.
pub fn board_blocks(markdown: &str, identifier: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                if info.split_whitespace().next() == Some(identifier) {
                    current = Some(String::new());
                }
            }
            Event::Text(text) => {
                if let Some(body) = current.as_mut() {
                    body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut body) = current.take() {
                    if body.ends_with('\n') {
                        body.pop();
                    }
                    blocks.push(body);
                }
            }
            _ => {}
        }
    }
    blocks
}

pub fn first_board_block(markdown: &str, identifier: &str) -> Option<String> {
    board_blocks(markdown, identifier).into_iter().next()
}
