use dataset::Entity;
use std::collections::HashMap;

/// Entity id -> entity record.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    entities: HashMap<String, Entity>,
}

impl EntityIndex {
    /// Build the index from an entity list. When two entities share an id the
    /// later one wins.
    pub fn build(entities: &[Entity]) -> Self {
        let mut index = HashMap::with_capacity(entities.len());
        for entity in entities {
            index.insert(entity.id.clone(), entity.clone());
        }
        Self { entities: index }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

pub fn build_entity_index(entities: &[Entity]) -> EntityIndex {
    EntityIndex::build(entities)
}
