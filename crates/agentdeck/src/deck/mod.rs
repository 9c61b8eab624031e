pub mod inline;
pub mod validate;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub use validate::DeckError;

/// The deck shipped with the binary, used when no file is given.
const BUILTIN_DECK: &str = include_str!("../../../../decks/ai-agents.yaml");

/// Where the built-in deck's `images/` are looked up: the `decks/` directory
/// of the source checkout the binary was built from.
const BUILTIN_ASSETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../decks");

/// An ordered, validated, read-only sequence of slides.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
    count: NonZeroUsize,
    /// Directory that relative image paths resolve against.
    base_path: PathBuf,
}

/// One addressable unit of the presentation.
///
/// Two slides are equal when their ids are equal; the id is also the render key.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSlide")]
pub struct Slide {
    pub id: u32,
    pub section: Option<Breadcrumb>,
    pub kind: SlideKind,
}

impl PartialEq for Slide {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Slide {}

/// Section breadcrumb shown above a slide title ("01 Foundations").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub number: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlideKind {
    Cover {
        title: String,
        #[serde(default)]
        subtitle: Option<String>,
        #[serde(default)]
        author: Option<String>,
    },
    Section {
        number: String,
        title: String,
    },
    Content {
        title: String,
        content: Content,
    },
    Tokenizer {
        title: String,
    },
    LlmDemo {
        title: String,
    },
    ContextGraph {
        title: String,
    },
    LostMiddle {
        title: String,
    },
    Image {
        title: String,
        image_src: String,
        #[serde(default)]
        image_alt: Option<String>,
    },
    AgentList {
        title: String,
    },
    SubscriptionValue {
        title: String,
    },
    ClaudeHierarchy {
        title: String,
    },
    SddWorkflow {
        title: String,
    },
}

/// Field-less mirror of [`SlideKind`], used to enumerate the closed set of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideTag {
    Cover,
    Section,
    Content,
    Tokenizer,
    LlmDemo,
    ContextGraph,
    LostMiddle,
    Image,
    AgentList,
    SubscriptionValue,
    ClaudeHierarchy,
    SddWorkflow,
}

impl SlideTag {
    pub const ALL: [SlideTag; 12] = [
        SlideTag::Cover,
        SlideTag::Section,
        SlideTag::Content,
        SlideTag::Tokenizer,
        SlideTag::LlmDemo,
        SlideTag::ContextGraph,
        SlideTag::LostMiddle,
        SlideTag::Image,
        SlideTag::AgentList,
        SlideTag::SubscriptionValue,
        SlideTag::ClaudeHierarchy,
        SlideTag::SddWorkflow,
    ];

    /// The `type` value used in deck files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Section => "section",
            Self::Content => "content",
            Self::Tokenizer => "tokenizer",
            Self::LlmDemo => "llm-demo",
            Self::ContextGraph => "context-graph",
            Self::LostMiddle => "lost-middle",
            Self::Image => "image",
            Self::AgentList => "agent-list",
            Self::SubscriptionValue => "subscription-value",
            Self::ClaudeHierarchy => "claude-hierarchy",
            Self::SddWorkflow => "sdd-workflow",
        }
    }
}

impl SlideKind {
    pub fn tag(&self) -> SlideTag {
        match self {
            Self::Cover { .. } => SlideTag::Cover,
            Self::Section { .. } => SlideTag::Section,
            Self::Content { .. } => SlideTag::Content,
            Self::Tokenizer { .. } => SlideTag::Tokenizer,
            Self::LlmDemo { .. } => SlideTag::LlmDemo,
            Self::ContextGraph { .. } => SlideTag::ContextGraph,
            Self::LostMiddle { .. } => SlideTag::LostMiddle,
            Self::Image { .. } => SlideTag::Image,
            Self::AgentList { .. } => SlideTag::AgentList,
            Self::SubscriptionValue { .. } => SlideTag::SubscriptionValue,
            Self::ClaudeHierarchy { .. } => SlideTag::ClaudeHierarchy,
            Self::SddWorkflow { .. } => SlideTag::SddWorkflow,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Cover { title, .. }
            | Self::Section { title, .. }
            | Self::Content { title, .. }
            | Self::Tokenizer { title }
            | Self::LlmDemo { title }
            | Self::ContextGraph { title }
            | Self::LostMiddle { title }
            | Self::Image { title, .. }
            | Self::AgentList { title }
            | Self::SubscriptionValue { title }
            | Self::ClaudeHierarchy { title }
            | Self::SddWorkflow { title } => title,
        }
    }
}

/// Body of a text-bearing slide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawContent")]
pub enum Content {
    Text(String),
    Items(Vec<ContentItem>),
}

/// A single bullet, or a heading with a nested list of sub-bullets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Bullet(String),
    Group { heading: String, bullets: Vec<String> },
}

#[derive(Deserialize)]
struct RawSlide {
    id: u32,
    #[serde(default)]
    section_number: Option<String>,
    #[serde(default)]
    section_title: Option<String>,
    #[serde(flatten)]
    kind: SlideKind,
}

impl TryFrom<RawSlide> for Slide {
    type Error = DeckError;

    fn try_from(raw: RawSlide) -> std::result::Result<Self, Self::Error> {
        let section = match (raw.section_number, raw.section_title) {
            (Some(number), Some(title)) => Some(Breadcrumb { number, title }),
            (None, None) => None,
            _ => return Err(DeckError::PartialBreadcrumb { id: raw.id }),
        };
        Ok(Slide {
            id: raw.id,
            section,
            kind: raw.kind,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Items(Vec<RawItem>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItem {
    Bullet(String),
    Group(Vec<String>),
}

impl TryFrom<RawContent> for Content {
    type Error = DeckError;

    fn try_from(raw: RawContent) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawContent::Text(text) => Ok(Content::Text(text)),
            RawContent::Items(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    RawItem::Bullet(text) => Ok(ContentItem::Bullet(text)),
                    RawItem::Group(mut lines) => {
                        if lines.is_empty() {
                            return Err(DeckError::EmptyGroup { index });
                        }
                        let heading = lines.remove(0);
                        Ok(ContentItem::Group {
                            heading,
                            bullets: lines,
                        })
                    }
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Content::Items),
        }
    }
}

/// Parse slide records from YAML without validating the sequence.
pub fn parse_yaml(source: &str) -> Result<Vec<Slide>> {
    serde_yaml::from_str(source).context("Failed to parse deck YAML")
}

/// Parse slide records from JSON without validating the sequence.
pub fn parse_json(source: &str) -> Result<Vec<Slide>> {
    serde_json::from_str(source).context("Failed to parse deck JSON")
}

/// Read slide records from a file; `.json` is parsed as JSON, anything else as YAML.
pub fn parse_file(path: &Path) -> Result<Vec<Slide>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&source)
    } else {
        parse_yaml(&source)
    }
}

impl Deck {
    /// Build a deck, rejecting any slide sequence that breaks the model's invariants.
    pub fn new(
        slides: Vec<Slide>,
        base_path: PathBuf,
    ) -> std::result::Result<Self, Vec<DeckError>> {
        let errors = validate::validate(&slides);
        if !errors.is_empty() {
            return Err(errors);
        }
        let count = NonZeroUsize::new(slides.len()).ok_or_else(|| vec![DeckError::Empty])?;
        Ok(Self {
            slides,
            count,
            base_path,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(parse_yaml(BUILTIN_DECK)?, PathBuf::from(BUILTIN_ASSETS)).map_err(invalid_deck)
    }

    /// Parse and validate a YAML deck; images resolve against the working directory.
    pub fn from_yaml(source: &str) -> Result<Self> {
        Self::new(parse_yaml(source)?, working_dir()).map_err(invalid_deck)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Self::new(parse_json(source)?, working_dir()).map_err(invalid_deck)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let slides = parse_file(path)?;
        let base_path = path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        Self::new(slides, base_path)
            .map_err(invalid_deck)
            .with_context(|| format!("Invalid deck {}", path.display()))
    }

    /// The built-in deck, or the file at `path` when one is given.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn count(&self) -> NonZeroUsize {
        self.count
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn invalid_deck(errors: Vec<DeckError>) -> anyhow::Error {
    let lines: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
    anyhow::anyhow!("Deck has {} problem(s):\n{}", errors.len(), lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_from(yaml: &str) -> std::result::Result<Deck, Vec<DeckError>> {
        let slides = parse_yaml(yaml).expect("yaml should parse");
        Deck::new(slides, PathBuf::from("."))
    }

    #[test]
    fn test_builtin_deck_loads() {
        let deck = Deck::builtin().expect("built-in deck must be valid");
        assert_eq!(deck.len(), 38);
        assert_eq!(deck.count().get(), 38);
        assert!(matches!(deck.slides()[0].kind, SlideKind::Cover { .. }));
        assert!(matches!(deck.slides()[3].kind, SlideKind::LlmDemo { .. }));
    }

    #[test]
    fn test_builtin_images_resolve_in_decks_dir() {
        let deck = Deck::builtin().unwrap();
        assert!(deck.base_path().join("ai-agents.yaml").is_file());
    }

    #[test]
    fn test_builtin_deck_uses_every_kind() {
        let deck = Deck::builtin().unwrap();
        for tag in SlideTag::ALL {
            assert!(
                deck.iter().any(|s| s.kind.tag() == tag),
                "built-in deck has no {} slide",
                tag.name()
            );
        }
    }

    #[test]
    fn test_builtin_breadcrumbs() {
        let deck = Deck::builtin().unwrap();
        let slide = deck.get(2).unwrap();
        assert_eq!(
            slide.section,
            Some(Breadcrumb {
                number: "01".to_string(),
                title: "Foundations".to_string(),
            })
        );
        // Section dividers and the closing slide carry no breadcrumb.
        assert!(deck.get(1).unwrap().section.is_none());
        assert!(deck.get(37).unwrap().section.is_none());
    }

    #[test]
    fn test_grouped_content_items() {
        let yaml = r#"
- id: 1
  type: content
  title: Groups
  content:
    - A
    - [B, C, D]
"#;
        let deck = deck_from(yaml).unwrap();
        let SlideKind::Content { content, .. } = &deck.get(0).unwrap().kind else {
            panic!("expected a content slide");
        };
        assert_eq!(
            content,
            &Content::Items(vec![
                ContentItem::Bullet("A".to_string()),
                ContentItem::Group {
                    heading: "B".to_string(),
                    bullets: vec!["C".to_string(), "D".to_string()],
                },
            ])
        );
    }

    #[test]
    fn test_single_string_content() {
        let yaml = "- id: 7\n  type: content\n  title: Note\n  content: Just one line\n";
        let deck = deck_from(yaml).unwrap();
        assert!(matches!(
            &deck.get(0).unwrap().kind,
            SlideKind::Content { content: Content::Text(t), .. } if t == "Just one line"
        ));
    }

    #[test]
    fn test_group_heading_only() {
        let yaml = "- id: 1\n  type: content\n  title: T\n  content:\n    - [Lonely]\n";
        let deck = deck_from(yaml).unwrap();
        let SlideKind::Content { content, .. } = &deck.get(0).unwrap().kind else {
            panic!("expected a content slide");
        };
        assert_eq!(
            content,
            &Content::Items(vec![ContentItem::Group {
                heading: "Lonely".to_string(),
                bullets: vec![],
            }])
        );
    }

    #[test]
    fn test_empty_group_rejected() {
        let yaml = "- id: 1\n  type: content\n  title: T\n  content:\n    - []\n";
        let err = parse_yaml(yaml).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("empty group"), "unexpected error: {message}");
    }

    #[test]
    fn test_breadcrumb_must_be_paired() {
        let yaml = "- id: 4\n  type: tokenizer\n  title: T\n  section_number: '01'\n";
        let err = parse_yaml(yaml).unwrap_err();
        let message = format!("{err:#}");
        assert!(
            message.contains("section_number and section_title"),
            "unexpected error: {message}"
        );
    }

    #[test]
    fn test_invalid_deck_lists_problems() {
        let yaml = "- id: 1\n  type: tokenizer\n  title: A\n\
                    - id: 1\n  type: tokenizer\n  title: ''\n";
        let err = Deck::from_yaml(yaml).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Deck has 2 problem(s)"), "{message}");
        assert!(message.contains("slide id 1 is used at positions 1 and 2"));
        assert!(message.contains("slide 1: title is empty"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = "- id: 1\n  type: hologram\n  title: T\n";
        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_json_deck() {
        let json = r#"[
            {"id": 1, "type": "cover", "title": "Hello"},
            {"id": 2, "type": "image", "title": "Pic", "image_src": "a.png",
             "section_number": "01", "section_title": "Intro"}
        ]"#;
        let deck = Deck::from_json(json).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.get(1).unwrap().kind.title(), "Pic");
        assert!(deck.get(1).unwrap().section.is_some());
    }

    #[test]
    fn test_slide_equality_is_by_id() {
        let a = Slide {
            id: 3,
            section: None,
            kind: SlideKind::Tokenizer {
                title: "One".to_string(),
            },
        };
        let b = Slide {
            id: 3,
            section: None,
            kind: SlideKind::AgentList {
                title: "Two".to_string(),
            },
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_tag_names_match_deck_types() {
        for tag in SlideTag::ALL {
            let extra = match tag {
                SlideTag::Section => "  number: '01'\n",
                SlideTag::Content => "  content: x\n",
                SlideTag::Image => "  image_src: a.png\n",
                _ => "",
            };
            let yaml = format!("- id: 1\n  type: {}\n  title: T\n{extra}", tag.name());
            let slides = parse_yaml(&yaml).unwrap();
            assert_eq!(slides[0].kind.tag(), tag);
            assert_eq!(slides[0].kind.title(), "T");
        }
    }
}
