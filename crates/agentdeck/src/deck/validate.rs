use std::collections::HashMap;

use super::{Content, ContentItem, Slide, SlideKind};

/// A single structural problem in a deck.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("deck has no slides")]
    Empty,
    #[error("slide at position {position} has id 0; ids must be positive")]
    ZeroId { position: usize },
    #[error("slide id {id} is used at positions {first} and {second}")]
    DuplicateId { id: u32, first: usize, second: usize },
    #[error("slide {id}: section_number and section_title must be given together")]
    PartialBreadcrumb { id: u32 },
    #[error("slide {id}: {field} is empty")]
    EmptyField { id: u32, field: &'static str },
    #[error("slide {id}: content has no items")]
    EmptyContent { id: u32 },
    #[error("content item {index} is an empty group")]
    EmptyGroup { index: usize },
}

/// Check a slide sequence, returning every problem found (empty when valid).
///
/// Positions in the returned errors are 1-based, matching the on-screen counter.
pub fn validate(slides: &[Slide]) -> Vec<DeckError> {
    let mut errors = Vec::new();
    if slides.is_empty() {
        errors.push(DeckError::Empty);
        return errors;
    }

    let mut seen: HashMap<u32, usize> = HashMap::new();
    for (i, slide) in slides.iter().enumerate() {
        let position = i + 1;
        if slide.id == 0 {
            errors.push(DeckError::ZeroId { position });
        } else if let Some(&first) = seen.get(&slide.id) {
            errors.push(DeckError::DuplicateId {
                id: slide.id,
                first,
                second: position,
            });
        } else {
            seen.insert(slide.id, position);
        }
        check_fields(slide, &mut errors);
    }
    errors
}

fn check_fields(slide: &Slide, errors: &mut Vec<DeckError>) {
    let id = slide.id;
    require(errors, id, slide.kind.title(), "title");
    if let Some(section) = &slide.section {
        require(errors, id, &section.number, "section_number");
        require(errors, id, &section.title, "section_title");
    }
    match &slide.kind {
        SlideKind::Section { number, .. } => require(errors, id, number, "number"),
        SlideKind::Image { image_src, .. } => require(errors, id, image_src, "image_src"),
        SlideKind::Content { content, .. } => match content {
            Content::Text(text) => require(errors, id, text, "content"),
            Content::Items(items) if items.is_empty() => {
                errors.push(DeckError::EmptyContent { id });
            }
            Content::Items(items) => {
                for item in items {
                    match item {
                        ContentItem::Bullet(text) => require(errors, id, text, "bullet"),
                        ContentItem::Group { heading, bullets } => {
                            require(errors, id, heading, "group heading");
                            for bullet in bullets {
                                require(errors, id, bullet, "bullet");
                            }
                        }
                    }
                }
            }
        },
        _ => {}
    }
}

fn require(errors: &mut Vec<DeckError>, id: u32, value: &str, field: &'static str) {
    if value.trim().is_empty() {
        errors.push(DeckError::EmptyField { id, field });
    }
}
