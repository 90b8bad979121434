//! Grouping of hierarchy edges under their parent.

use std::collections::HashMap;

use crate::types::DbId;

/// All child edges recorded under one parent, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentGroup<E> {
    pub parent_id: DbId,
    pub children: Vec<E>,
}

/// Group edges by parent id.
///
/// Groups appear in the order their parent is first seen and each group
/// keeps its edges in input order, so a query ordered by parent and
/// sequence number renders unchanged. Parents that merely share a display
/// name stay in separate groups.
pub fn group_by_parent<E, I, F>(edges: I, parent_id: F) -> Vec<ParentGroup<E>>
where
    I: IntoIterator<Item = E>,
    F: Fn(&E) -> DbId,
{
    let mut groups: Vec<ParentGroup<E>> = Vec::new();
    let mut index: HashMap<DbId, usize> = HashMap::new();

    for edge in edges {
        let id = parent_id(&edge);
        match index.get(&id) {
            Some(&slot) => groups[slot].children.push(edge),
            None => {
                index.insert(id, groups.len());
                groups.push(ParentGroup {
                    parent_id: id,
                    children: vec![edge],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_groups() {
        let groups = group_by_parent(Vec::<(DbId, &str)>::new(), |e| e.0);
        assert!(groups.is_empty());
    }

    #[test]
    fn siblings_share_one_group_in_order() {
        let edges = vec![(1, "X"), (1, "Y")];
        let groups = group_by_parent(edges, |e| e.0);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].parent_id, 1);
        assert_eq!(groups[0].children, vec![(1, "X"), (1, "Y")]);
    }

    #[test]
    fn groups_follow_first_appearance() {
        let edges = vec![(7, "a"), (3, "b"), (7, "c"), (5, "d")];
        let groups = group_by_parent(edges, |e| e.0);

        let ids: Vec<DbId> = groups.iter().map(|g| g.parent_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
        assert_eq!(groups[0].children, vec![(7, "a"), (7, "c")]);
    }

    #[test]
    fn equal_names_with_distinct_ids_are_not_merged() {
        // (parent_id, parent_name, child)
        let edges = vec![(1, "Corp", "X"), (2, "Corp", "Y")];
        let groups = group_by_parent(edges, |e| e.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].children.len(), 1);
        assert_eq!(groups[1].children.len(), 1);
    }
}
