//! 分类树构建
//!
//! 平铺的分类列表 → 以 `parentId` 连接的树，O(n)。
//! 父节点不存在的孤儿节点被丢弃；环上的节点永远到不了根，同样被丢弃。

use std::collections::HashMap;

use crate::db::models::{Category, CategoryNode};

/// Build the category forest, keeping fetch order among siblings
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let index: HashMap<String, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id_string(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, category) in categories.iter().enumerate() {
        if category.is_root() {
            roots.push(i);
        } else if let Some(parent) = category.parent_id.as_deref().and_then(|p| index.get(p)) {
            children[*parent].push(i);
        }
    }

    let mut slots: Vec<Option<Category>> = categories.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|i| assemble(i, &children, &mut slots))
        .collect()
}

// Each slot is taken once, so a node can never be attached twice.
fn assemble(
    i: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<Category>],
) -> Option<CategoryNode> {
    let category = slots[i].take()?;
    let kids = children[i]
        .iter()
        .filter_map(|&c| assemble(c, children, slots))
        .collect();
    Some(CategoryNode {
        category,
        children: kids,
    })
}

/// Number of root categories
pub fn count_roots(categories: &[Category]) -> usize {
    categories.iter().filter(|c| c.is_root()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn cat(key: &str, parent: Option<&str>) -> Category {
        Category {
            id: Some(RecordId::from_table_key("category", key)),
            name: key.to_uppercase(),
            parent_id: parent.map(|p| format!("category:{}", p)),
            ..Default::default()
        }
    }

    fn names(nodes: &[CategoryNode]) -> Vec<String> {
        nodes.iter().map(|n| n.category.name.clone()).collect()
    }

    #[test]
    fn test_nesting_and_order() {
        let tree = build_tree(vec![
            cat("a", None),
            cat("a1", Some("a")),
            cat("b", None),
            cat("a2", Some("a")),
            cat("a1x", Some("a1")),
        ]);
        assert_eq!(names(&tree), vec!["A", "B"]);
        assert_eq!(names(&tree[0].children), vec!["A1", "A2"]);
        assert_eq!(names(&tree[0].children[0].children), vec!["A1X"]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_child_before_parent() {
        let tree = build_tree(vec![cat("a1", Some("a")), cat("a", None)]);
        assert_eq!(names(&tree), vec!["A"]);
        assert_eq!(names(&tree[0].children), vec!["A1"]);
    }

    #[test]
    fn test_orphans_dropped() {
        let tree = build_tree(vec![cat("a", None), cat("x", Some("missing"))]);
        assert_eq!(names(&tree), vec!["A"]);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_cycles_dropped() {
        let tree = build_tree(vec![cat("a", None), cat("p", Some("q")), cat("q", Some("p"))]);
        assert_eq!(names(&tree), vec!["A"]);
    }

    #[test]
    fn test_empty_parent_is_root() {
        let mut c = cat("a", None);
        c.parent_id = Some(String::new());
        assert_eq!(build_tree(vec![c.clone()]).len(), 1);
        assert_eq!(count_roots(&[c, cat("b", Some("a"))]), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let tree = build_tree(vec![cat("a", None), cat("a1", Some("a"))]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["id"], "category:a");
        assert_eq!(json[0]["children"][0]["parentId"], "category:a");
    }
}
