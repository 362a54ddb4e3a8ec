//! Host-page markup for chat messages and dice
//!
//! A die is a `span.six-sided-die` holding a 3x3 grid of `span.dot` cells.
//! Cells showing a pip contain a bullet; the others are empty.

use crate::application::ports::outbound::{DocumentError, DocumentPort, ElementId, NewElement};
use crate::domain::entities::{DIE_CLASS, DOT_CLASS};

const PIP: &str = "\u{2022}";

/// Grid cells (row-major, 0..9) lit for each face
fn pip_cells(pips: u32) -> &'static [usize] {
    match pips {
        1 => &[4],
        2 => &[0, 8],
        3 => &[0, 4, 8],
        4 => &[0, 2, 6, 8],
        5 => &[0, 2, 4, 6, 8],
        6 => &[0, 2, 3, 5, 6, 8],
        _ => &[],
    }
}

/// Append a rendered die to `parent`
pub fn render_die<D: DocumentPort + ?Sized>(
    document: &D,
    parent: ElementId,
    pips: u32,
) -> Result<ElementId, DocumentError> {
    let die = document.append_element(
        parent,
        NewElement::new("span")
            .with_class(DIE_CLASS)
            .with_attribute("title", pips.to_string()),
    )?;
    let lit = pip_cells(pips);
    for cell in 0..9 {
        let text = if lit.contains(&cell) { PIP } else { "" };
        document.append_element(die, NewElement::new("span").with_class(DOT_CLASS).with_text(text))?;
    }
    Ok(die)
}

/// Append a chat message with its dice to `container`
pub fn render_message<D: DocumentPort + ?Sized>(
    document: &D,
    container: ElementId,
    author: &str,
    dice: &[u32],
) -> Result<ElementId, DocumentError> {
    let message = document.append_element(container, NewElement::new("div").with_class("message"))?;
    document.append_element(
        message,
        NewElement::new("div").with_class("username").with_text(author),
    )?;
    let content = document.append_element(message, NewElement::new("div").with_class("content"))?;
    for pips in dice {
        render_die(document, content, *pips)?;
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::document::MemoryDocument;

    #[test]
    fn test_die_renders_nine_cells() {
        let document = MemoryDocument::new();
        let die = render_die(&document, document.body(), 4).unwrap();

        let dots = document.descendants_with_class(die, DOT_CLASS).unwrap();
        assert_eq!(dots.len(), 9);
        let lit = dots
            .iter()
            .filter(|d| !document.text_content(**d).unwrap().is_empty())
            .count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn test_message_holds_all_dice() {
        let document = MemoryDocument::new();
        let message = render_message(&document, document.body(), "alice", &[1, 2, 6]).unwrap();
        assert_eq!(document.descendants_with_class(message, DIE_CLASS).unwrap().len(), 3);
    }
}
