use std::collections::HashMap;
use std::sync::Arc;

use crate::container::{FunctionalGroupDef, InterchangeDef, TransactionSetDef};
use crate::element::ElementDef;
use crate::segment::SegmentDict;

/// Version-scoped lookup of schema definitions.
///
/// `x12-parser` depends only on this trait, never on a concrete catalog,
/// so a full enumerated X12 dictionary can be swapped in without touching
/// the parser. Implementations must be `Send + Sync`: a parser may run
/// many interchanges concurrently against one shared catalog (`spec.md`
/// §5).
pub trait SchemaCatalog: Send + Sync {
    fn interchange_def(&self, version: &str) -> Option<Arc<InterchangeDef>>;

    fn functional_group_def(
        &self,
        version: &str,
        functional_id_code: &str,
    ) -> Option<Arc<FunctionalGroupDef>>;

    fn transaction_set_def(
        &self,
        version: &str,
        transaction_set_id: &str,
    ) -> Option<Arc<TransactionSetDef>>;

    fn segment_dict(&self, version: &str) -> Option<Arc<SegmentDict>>;

    fn element_def(&self, id: &str) -> Option<Arc<ElementDef>>;
}

/// An in-memory, hand-populated catalog.
///
/// This is deliberately illustrative, not exhaustive: it is not a
/// replacement for the thousands of segment/transaction-set definitions
/// published across X12 versions, only enough of a skeleton (envelope
/// segments plus a couple of representative transaction sets) to exercise
/// `x12-parser`/`x12-writer`/`x12-validation` end to end. Real deployments
/// provide their own `SchemaCatalog` impl, generated or hand-maintained,
/// from the published implementation guides.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    interchanges: HashMap<String, Arc<InterchangeDef>>,
    functional_groups: HashMap<(String, String), Arc<FunctionalGroupDef>>,
    transaction_sets: HashMap<(String, String), Arc<TransactionSetDef>>,
    dicts: HashMap<String, Arc<SegmentDict>>,
    elements: HashMap<String, Arc<ElementDef>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_interchange(&mut self, def: Arc<InterchangeDef>) {
        self.dicts.insert(def.version.clone(), def.dict.clone());
        self.interchanges.insert(def.version.clone(), def);
    }

    pub fn register_functional_group(&mut self, version: &str, def: Arc<FunctionalGroupDef>) {
        self.functional_groups
            .insert((version.to_string(), def.functional_id_code.clone()), def);
    }

    pub fn register_transaction_set(&mut self, version: &str, def: Arc<TransactionSetDef>) {
        self.transaction_sets
            .insert((version.to_string(), def.id.clone()), def);
    }

    pub fn register_element(&mut self, def: Arc<ElementDef>) {
        self.elements.insert(def.id.clone(), def);
    }
}

impl SchemaCatalog for StaticCatalog {
    fn interchange_def(&self, version: &str) -> Option<Arc<InterchangeDef>> {
        self.interchanges.get(version).cloned()
    }

    fn functional_group_def(
        &self,
        version: &str,
        functional_id_code: &str,
    ) -> Option<Arc<FunctionalGroupDef>> {
        self.functional_groups
            .get(&(version.to_string(), functional_id_code.to_string()))
            .cloned()
    }

    fn transaction_set_def(
        &self,
        version: &str,
        transaction_set_id: &str,
    ) -> Option<Arc<TransactionSetDef>> {
        self.transaction_sets
            .get(&(version.to_string(), transaction_set_id.to_string()))
            .cloned()
    }

    fn segment_dict(&self, version: &str) -> Option<Arc<SegmentDict>> {
        self.dicts.get(version).cloned()
    }

    fn element_def(&self, id: &str) -> Option<Arc<ElementDef>> {
        self.elements.get(id).cloned()
    }
}

fn assert_send_sync<T: Send + Sync>() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_is_send_sync() {
        assert_send_sync::<StaticCatalog>();
    }

    #[test]
    fn static_catalog_roundtrips_elements() {
        let mut catalog = StaticCatalog::new();
        let def = ElementDef::new("E98", "Entity Identifier Code", 2, 3, crate::element::ElementKind::Identifier)
            .unwrap();
        catalog.register_element(def.clone());
        assert_eq!(catalog.element_def("E98"), Some(def));
        assert_eq!(catalog.element_def("MISSING"), None);
    }
}
