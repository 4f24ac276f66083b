use serde::{Deserialize, Serialize};

/// The two kinds of each dataset variant.
///
/// Variant 1 pairs themes with laboratories, variant 2 pairs research units
/// with sustainable development goals (ODD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "theme")]
    Theme,
    #[serde(rename = "laboratoire", alias = "lab")]
    Laboratory,
    #[serde(rename = "unite_recherche")]
    ResearchUnit,
    #[serde(rename = "odd")]
    Odd,
}

impl EntityKind {
    /// Map a free-text kind label onto a kind.
    /// Unknown labels fall back to `ResearchUnit`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "odd" => EntityKind::Odd,
            "theme" | "thème" => EntityKind::Theme,
            "laboratoire" | "lab" => EntityKind::Laboratory,
            "unité de recherche" | "unite de recherche" | "unite_recherche" => {
                EntityKind::ResearchUnit
            }
            _ => EntityKind::ResearchUnit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Theme => "theme",
            EntityKind::Laboratory => "laboratoire",
            EntityKind::ResearchUnit => "unite_recherche",
            EntityKind::Odd => "odd",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Undirected link between two entities ("liaison").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A parsed dataset: the entity sheet and the edge sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(alias = "poles")]
    pub entities: Vec<Entity>,
    #[serde(alias = "liaisons", alias = "links")]
    pub edges: Vec<Edge>,
}

impl Dataset {
    pub fn new(entities: Vec<Entity>, edges: Vec<Edge>) -> Self {
        Self { entities, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.edges.is_empty()
    }
}
