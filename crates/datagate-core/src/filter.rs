//! Scope-based field filtering.
//!
//! Redacts a provider response down to the fields unlocked by a set of
//! granted scopes. Anything not unlocked is omitted, at every level.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::ScopeCatalog;
use crate::error::GatewayResult;
use crate::models::field_path::FieldPath;
use crate::models::scope::Scope;

/// Trie of unlocked field paths.
#[derive(Debug, Default)]
struct PathTree {
    /// A complete unlocked path ends here: keep the whole subtree.
    leaf: bool,
    children: BTreeMap<String, PathTree>,
}

impl PathTree {
    fn insert(&mut self, path: &FieldPath) {
        let mut node = self;
        for segment in path.segments() {
            node = node.children.entry(segment.clone()).or_default();
        }
        node.leaf = true;
    }

    /// Filter a value sitting on a strict prefix of some unlocked path.
    ///
    /// Objects keep only unlocked children; arrays are filtered element
    /// by element and keep their length, a redacted scalar element
    /// becoming `null`; scalars cannot contain the unlocked leaf and are
    /// dropped.
    fn prune(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Object(fields) => Some(Value::Object(self.prune_object(fields))),
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| self.prune(item).unwrap_or(Value::Null))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn prune_object(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        let mut kept = Map::new();
        for (key, value) in fields {
            let Some(child) = self.children.get(key) else {
                continue;
            };
            if child.leaf {
                kept.insert(key.clone(), value.clone());
            } else if let Some(pruned) = child.prune(value) {
                kept.insert(key.clone(), pruned);
            }
        }
        kept
    }
}

/// Field filter over the composed scope catalog.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    catalog: ScopeCatalog,
}

impl FieldFilter {
    pub fn new(catalog: ScopeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ScopeCatalog {
        &self.catalog
    }

    /// Keep only the parts of `raw` unlocked by `scopes`.
    ///
    /// Every scope is resolved before any filtering happens, so an
    /// unknown scope fails the whole call. An empty scope set yields an
    /// empty object. A top-level scalar is not addressable by any path
    /// and becomes `null`.
    pub fn filter<'a, I>(&self, scopes: I, raw: &Value) -> GatewayResult<Value>
    where
        I: IntoIterator<Item = &'a Scope>,
    {
        let mut tree = PathTree::default();
        let mut granted = 0usize;
        for scope in scopes {
            for path in self.catalog.fields_for(scope)? {
                tree.insert(path);
            }
            granted += 1;
        }
        debug!(granted, "Filtering provider response");

        Ok(tree.prune(raw).unwrap_or(Value::Null))
    }

    /// Serialize a typed provider output, then filter it.
    pub fn filter_output<'a, I, T>(&self, scopes: I, output: &T) -> GatewayResult<Value>
    where
        I: IntoIterator<Item = &'a Scope>,
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_value(output)?;
        self.filter(scopes, &raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::scope::{CnafScope, DgfipScope, MesriScope};

    fn filter() -> FieldFilter {
        FieldFilter::new(ScopeCatalog::standard().unwrap())
    }

    fn tree(paths: &[&str]) -> PathTree {
        let mut tree = PathTree::default();
        for path in paths {
            tree.insert(&FieldPath::parse(path));
        }
        tree
    }

    #[test]
    fn keeps_only_unlocked_top_level_fields() {
        let raw = json!({
            "adresse": "1 rue X",
            "allocataires": ["A"],
            "quotientFamilial": 42,
            "mois": 3,
            "annee": 2024
        });
        let scopes = [
            Scope::Cnaf(CnafScope::Adresse),
            Scope::Cnaf(CnafScope::QuotientFamilial),
        ];

        let filtered = filter().filter(&scopes, &raw).unwrap();

        assert_eq!(
            filtered,
            json!({"adresse": "1 rue X", "quotientFamilial": 42, "mois": 3, "annee": 2024})
        );
    }

    #[test]
    fn nested_paths_keep_parent_objects() {
        let raw = json!({
            "declarant1": {"nom": "DUPONT", "prenoms": "Jean", "dateNaissance": "01/01/1970"},
            "declarant2": {"nom": "DURAND"},
            "foyerFiscal": {"adresse": "2 rue Y"},
            "montantImpot": 1200
        });
        let scopes = [Scope::Dgfip(DgfipScope::Declarant1Nom)];

        let filtered = filter().filter(&scopes, &raw).unwrap();

        assert_eq!(filtered, json!({"declarant1": {"nom": "DUPONT"}}));
    }

    #[test]
    fn paths_through_arrays_apply_to_each_element() {
        let raw = json!({
            "ine": "123",
            "inscriptions": [
                {"statut": "inscrit", "regime": "initiale", "etablissement": {"uai": "0751717J", "nom": "Paris 1"}},
                {"statut": "admis", "regime": "continue", "etablissement": {"uai": "0751718K", "nom": "Paris 2"}}
            ]
        });
        let scopes = [Scope::Mesri(MesriScope::Etablissements)];

        let filtered = filter().filter(&scopes, &raw).unwrap();

        assert_eq!(
            filtered,
            json!({"inscriptions": [
                {"etablissement": {"uai": "0751717J", "nom": "Paris 1"}},
                {"etablissement": {"uai": "0751718K", "nom": "Paris 2"}}
            ]})
        );
    }

    #[test]
    fn arrays_keep_length_and_positions() {
        let raw = json!({
            "inscriptions": [null, {"etablissement": {"uai": "X"}, "statut": "inscrit"}, "s"]
        });
        let scopes = [Scope::Mesri(MesriScope::Etablissements)];

        let filtered = filter().filter(&scopes, &raw).unwrap();

        assert_eq!(
            filtered,
            json!({"inscriptions": [null, {"etablissement": {"uai": "X"}}, null]})
        );
    }

    #[test]
    fn empty_scope_set_redacts_everything() {
        let raw = json!({"adresse": "1 rue X", "quotientFamilial": 42});
        let filtered = filter().filter(std::iter::empty(), &raw).unwrap();
        assert_eq!(filtered, json!({}));
    }

    #[test]
    fn overlapping_scopes_are_idempotent() {
        let raw = json!({"adresse": "1 rue X", "enfants": []});
        let once = [Scope::Cnaf(CnafScope::Adresse)];
        let twice = [
            Scope::Cnaf(CnafScope::Adresse),
            Scope::Cnaf(CnafScope::Adresse),
        ];
        assert_eq!(
            filter().filter(&once, &raw).unwrap(),
            filter().filter(&twice, &raw).unwrap()
        );
    }

    #[test]
    fn leaf_keeps_whole_subtree_and_value_types() {
        let t = tree(&["a", "a.b"]);
        let raw = json!({"a": {"b": 1, "c": [true, null]}, "d": 2});
        assert_eq!(t.prune(&raw), Some(json!({"a": {"b": 1, "c": [true, null]}})));
    }

    #[test]
    fn scalar_on_prefix_is_dropped() {
        let t = tree(&["a.b"]);
        assert_eq!(t.prune(&json!({"a": "flat"})), Some(json!({})));
        assert_eq!(t.prune(&json!({"a": null})), Some(json!({})));
        assert_eq!(t.prune(&json!({"a": {}})), Some(json!({"a": {}})));
    }

    #[test]
    fn top_level_shapes() {
        let t = tree(&["x"]);
        assert_eq!(
            t.prune(&json!([{"x": 1, "y": 2}, {"y": 3}, 4, [5]])),
            Some(json!([{"x": 1}, {}, null, [null]]))
        );
        assert_eq!(t.prune(&json!(7)), None);
        assert_eq!(filter().filter(std::iter::empty(), &json!("bare")).unwrap(), Value::Null);
    }

    #[test]
    fn unknown_scope_fails_without_output() {
        let catalog = ScopeCatalog::new([crate::catalog::ScopeRegistry::cnaf()]).unwrap();
        let filter = FieldFilter::new(catalog);
        let scopes = [
            Scope::Cnaf(CnafScope::Adresse),
            Scope::Dgfip(DgfipScope::MontantImpot),
        ];
        assert!(filter.filter(&scopes, &json!({"adresse": "x"})).is_err());
    }
}
