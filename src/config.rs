//! Layered, deep-mergeable configuration trees.
//!
//! A [`ConfigTree`] is a nested string-keyed mapping whose leaves are literal
//! values or [`LazyValue`]s. Trees merge with override-wins semantics and
//! resolve against a [`Scope`] into a literal-only [`ResolvedConfig`].
//!
//! Layering follows instantiation-over-template-over-defaults precedence: the
//! composer starts from the registry defaults, merges the template's local
//! overrides, and finally merges any per-case override supplied at
//! instantiation time.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{context::Scope, error::ResolveError, lazy::LazyValue};

/// One node of a [`ConfigTree`]: a literal leaf, a deferred leaf, or a
/// nested subtree.
#[derive(Clone, Debug)]
pub enum ConfigNode {
    /// A literal value.
    Literal(Value),
    /// A leaf resolved against the scenario's context at composition time.
    Lazy(LazyValue),
    /// A nested tree, merged recursively.
    Tree(ConfigTree),
}

/// A nested, mergeable configuration mapping.
///
/// # Examples
///
/// ```
/// use specframe::ConfigTree;
///
/// let defaults = ConfigTree::new()
///     .set("create.success_status", 201)
///     .set("create.fail_status", 422);
/// let overrides = ConfigTree::new().set("create.fail_status", 400);
///
/// let merged = defaults.merge(&overrides);
/// assert!(!merged.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigTree {
    entries: BTreeMap<String, ConfigNode>,
}

impl ConfigTree {
    /// The empty tree, the identity element of [`merge`](Self::merge).
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Set a literal leaf. Dots in `path` denote nesting; intermediate
    /// non-tree nodes are displaced.
    #[must_use]
    pub fn set(self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, ConfigNode::Literal(value.into()))
    }

    /// Set a deferred leaf, resolved against the scenario's context when the
    /// tree is resolved.
    #[must_use]
    pub fn set_lazy(self, path: &str, value: LazyValue) -> Self {
        self.insert(path, ConfigNode::Lazy(value))
    }

    fn insert(mut self, path: &str, node: ConfigNode) -> Self {
        match path.split_once('.') {
            None => {
                self.entries.insert(path.to_owned(), node);
            }
            Some((head, rest)) => {
                let subtree = match self.entries.remove(head) {
                    Some(ConfigNode::Tree(tree)) => tree,
                    _ => ConfigTree::new(),
                };
                self.entries
                    .insert(head.to_owned(), ConfigNode::Tree(subtree.insert(rest, node)));
            }
        }
        self
    }

    /// Whether the tree holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Deep-merge `overrides` over this tree, returning the combined tree.
    ///
    /// Keys present only in one side pass through unchanged; conflicting
    /// subtrees merge recursively; any other conflict is won by the override
    /// side. The operation is pure (neither input is mutated), associative,
    /// and right-biased, and merging with the empty tree is the identity.
    #[must_use]
    pub fn merge(&self, overrides: &ConfigTree) -> ConfigTree {
        let mut merged = self.clone();
        for (key, node) in &overrides.entries {
            let combined = match (merged.entries.remove(key), node) {
                (Some(ConfigNode::Tree(base)), ConfigNode::Tree(over)) => {
                    ConfigNode::Tree(base.merge(over))
                }
                (_, over) => over.clone(),
            };
            merged.entries.insert(key.clone(), combined);
        }
        merged
    }

    /// Resolve every deferred leaf against `scope`, yielding a literal-only
    /// tree.
    ///
    /// # Errors
    ///
    /// Propagates [`ResolveError`] from the first leaf that fails to resolve.
    pub fn resolve(&self, scope: &Scope<'_>) -> Result<ResolvedConfig, ResolveError> {
        Ok(ResolvedConfig(self.resolve_map(scope)?))
    }

    fn resolve_map(&self, scope: &Scope<'_>) -> Result<Map<String, Value>, ResolveError> {
        let mut map = Map::new();
        for (key, node) in &self.entries {
            let value = match node {
                ConfigNode::Literal(value) => value.clone(),
                ConfigNode::Lazy(lazy) => lazy.resolve(scope)?,
                ConfigNode::Tree(tree) => Value::Object(tree.resolve_map(scope)?),
            };
            map.insert(key.clone(), value);
        }
        Ok(map)
    }
}

/// A fully resolved configuration tree containing only literals.
///
/// Produced per scenario at composition time and attached to every plan
/// entry the scenario contributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolvedConfig(Map<String, Value>);

impl ResolvedConfig {
    /// Fetch a value by dotted path, e.g. `"authentication.fail_status"`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Fetch an integer leaf by dotted path.
    #[must_use]
    pub fn integer(&self, path: &str) -> Option<i64> { self.get(path).and_then(Value::as_i64) }

    /// Fetch a string leaf by dotted path.
    #[must_use]
    pub fn str(&self, path: &str) -> Option<&str> { self.get(path).and_then(Value::as_str) }

    /// Whether the resolved tree holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ConfigTree, ResolvedConfig};
    use crate::{Bindings, Context, LazyValue, lazy::Resolver};

    fn plain(tree: &ConfigTree) -> ResolvedConfig {
        let resolver = Resolver::new();
        let root = Context::root();
        let scope = resolver.scope(&root);
        tree.resolve(&scope).expect("literal tree resolves")
    }

    #[test]
    fn merge_passes_one_sided_keys_through() {
        let left = ConfigTree::new().set("a", 1);
        let right = ConfigTree::new().set("b", 2);
        let merged = plain(&left.merge(&right));
        assert_eq!(merged.get("a"), Some(&json!(1)));
        assert_eq!(merged.get("b"), Some(&json!(2)));
    }

    #[test]
    fn merge_override_wins_on_leaf_conflict() {
        let base = ConfigTree::new().set("authentication.fail_status", 401);
        let over = ConfigTree::new().set("authentication.fail_status", 419);
        let merged = plain(&base.merge(&over));
        assert_eq!(merged.integer("authentication.fail_status"), Some(419));
    }

    #[test]
    fn merge_recurses_into_conflicting_subtrees() {
        let base = ConfigTree::new()
            .set("create.success_status", 201)
            .set("create.fail_status", 422);
        let over = ConfigTree::new().set("create.fail_status", 400);
        let merged = plain(&base.merge(&over));
        assert_eq!(merged.integer("create.success_status"), Some(201));
        assert_eq!(merged.integer("create.fail_status"), Some(400));
    }

    #[test]
    fn merging_with_the_empty_tree_is_identity() {
        let tree = ConfigTree::new().set("update.success_status", 200);
        assert_eq!(plain(&tree.merge(&ConfigTree::new())), plain(&tree));
        assert_eq!(plain(&ConfigTree::new().merge(&tree)), plain(&tree));
    }

    #[test]
    fn lazy_leaves_resolve_against_the_scope() {
        let tree = ConfigTree::new()
            .set_lazy("template", LazyValue::computed(|scope| scope.get("action_name")));
        let context = Context::root().push(Bindings::new().bind("action_name", "index"));
        let resolver = Resolver::new();
        let scope = resolver.scope(&context);
        let resolved = tree.resolve(&scope).unwrap();
        assert_eq!(resolved.str("template"), Some("index"));
    }

    #[test]
    fn unresolvable_lazy_leaf_propagates_the_failure() {
        let tree = ConfigTree::new().set_lazy("template", LazyValue::computed(|scope| scope.get("action_name")));
        let resolver = Resolver::new();
        let root = Context::root();
        let scope = resolver.scope(&root);
        assert!(tree.resolve(&scope).is_err());
    }

    #[test]
    fn dotted_get_reaches_nested_leaves() {
        let resolved = plain(&ConfigTree::new().set("authentication.json", json!({ "error": "denied" })));
        assert_eq!(
            resolved.get("authentication.json.error"),
            Some(&json!("denied"))
        );
        assert_eq!(resolved.get("authentication.missing"), None);
    }
}
