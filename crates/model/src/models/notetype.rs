use crate::coerce::{Keyed, de};
use crate::Id;
use serde::Deserialize;
use time::UtcDateTime;

int_enum! {
    /// Note type flavour.
    pub enum ModelKind {
        Standard = 0,
        Cloze = 1,
    }
}
impl Default for ModelKind {
    fn default() -> Self {
        Self::Standard
    }
}

/// A note type: the fields a note has and the cards generated from it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Model {
    pub id: Id,
    pub name: String,
    /// Tags of the last note added with this model.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Deck new cards are added to by default.
    #[serde(default, rename = "did")]
    pub deck_id: Id,
    #[serde(rename = "flds")]
    pub fields: Vec<Field>,
    /// Which field is shown (and sorted on) in the browser.
    #[serde(default, rename = "sortf")]
    pub sort_field: usize,
    #[serde(rename = "tmpls")]
    pub templates: Vec<Template>,
    #[serde(default, rename = "type")]
    pub kind: ModelKind,
    #[serde(default, rename = "latexPre")]
    pub latex_pre: String,
    #[serde(default, rename = "latexPost")]
    pub latex_post: String,
    /// Shared by all templates.
    #[serde(default)]
    pub css: String,
    #[serde(default, rename = "mod", deserialize_with = "de::seconds_timestamp")]
    pub modified: Option<UtcDateTime>,
    /// Which fields must be non-empty for each template to generate a card.
    #[serde(default, rename = "req")]
    pub required: Vec<CardConstraint>,
    #[serde(default)]
    pub usn: i64,
}
impl Model {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn template(&self, ordinal: usize) -> Option<&Template> {
        self.templates.iter().find(|template| template.ordinal == ordinal)
    }

    #[must_use]
    pub fn is_cloze(&self) -> bool {
        self.kind == ModelKind::Cloze
    }
}
impl Keyed for Model {
    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Field {
    pub name: String,
    /// Sticky fields keep their last value when adding notes.
    #[serde(default)]
    pub sticky: bool,
    #[serde(default)]
    pub rtl: bool,
    /// Position of this field's value in a note's field list.
    #[serde(rename = "ord")]
    pub ordinal: usize,
    #[serde(default)]
    pub font: String,
    #[serde(default, rename = "size")]
    pub font_size: u32,
}

/// One card variant generated from a note.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(rename = "ord")]
    pub ordinal: usize,
    #[serde(rename = "qfmt")]
    pub question_format: String,
    #[serde(rename = "afmt")]
    pub answer_format: String,
    #[serde(default, rename = "bqfmt")]
    pub browser_question_format: String,
    #[serde(default, rename = "bafmt")]
    pub browser_answer_format: String,
    /// Deck the generated cards go to instead of the note's deck; empty if none.
    #[serde(default, rename = "did")]
    pub deck_override: Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Any,
    All,
    /// The template can never be generated.
    None,
}

/// Stored as a `[template, "any"|"all"|"none", [field ordinals]]` triple.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(usize, Requirement, Vec<usize>)")]
pub struct CardConstraint {
    pub template: usize,
    pub requirement: Requirement,
    pub fields: Vec<usize>,
}
impl From<(usize, Requirement, Vec<usize>)> for CardConstraint {
    fn from((template, requirement, fields): (usize, Requirement, Vec<usize>)) -> Self {
        Self { template, requirement, fields }
    }
}
