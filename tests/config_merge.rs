//! Property tests for the config-merge laws.
//!
//! Merge must be associative and right-biased, with the empty tree as the
//! identity element. Trees are generated from dotted-path/leaf pairs and
//! compared through their resolved literal form.
//!
//! Tree-position keys (`a`-`c`) and leaf-position keys (`x`-`z`) come from
//! disjoint alphabets, so a given key is a subtree in every generated tree
//! or a leaf in every generated tree. Associativity only holds under that
//! discipline: a key that is a leaf on one side and a subtree on another is
//! resolved override-wins, which is order-sensitive by construction.

use proptest::prelude::*;
use serde_json::Value;
use specframe::{ConfigTree, Context, ResolvedConfig, Resolver};

fn plain(tree: &ConfigTree) -> ResolvedConfig {
    let resolver = Resolver::new();
    let root = Context::root();
    let scope = resolver.scope(&root);
    tree.resolve(&scope).expect("literal tree resolves")
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z]{1,4}".prop_map(Value::from),
    ]
}

prop_compose! {
    fn path()(path in "([a-c]\\.){0,2}[x-z]") -> String { path }
}

prop_compose! {
    fn tree()(entries in prop::collection::vec((path(), leaf()), 0..6)) -> ConfigTree {
        entries
            .into_iter()
            .fold(ConfigTree::new(), |tree, (path, value)| tree.set(&path, value))
    }
}

proptest! {
    #[test]
    fn merge_is_associative(a in tree(), b in tree(), c in tree()) {
        prop_assert_eq!(plain(&a.merge(&b).merge(&c)), plain(&a.merge(&b.merge(&c))));
    }

    #[test]
    fn empty_tree_is_the_identity(a in tree()) {
        prop_assert_eq!(plain(&a.merge(&ConfigTree::new())), plain(&a));
        prop_assert_eq!(plain(&ConfigTree::new().merge(&a)), plain(&a));
    }

    #[test]
    fn rightmost_leaf_wins(path in path(), left in leaf(), right in leaf()) {
        let base = ConfigTree::new().set(&path, left);
        let over = ConfigTree::new().set(&path, right.clone());
        let merged = plain(&base.merge(&over));
        prop_assert_eq!(merged.get(&path), Some(&right));
    }

    #[test]
    fn one_sided_keys_pass_through(a in tree(), path in path(), value in leaf()) {
        // `q` is outside both alphabets, so no entry of `a` can displace it.
        let probe = format!("q.{path}");
        let over = ConfigTree::new().set(&probe, value.clone());
        let merged = plain(&a.merge(&over));
        prop_assert_eq!(merged.get(&probe), Some(&value));
    }
}
