//! Shuffle orders
//!
//! A shuffle's order lists positions of its non-content children. Content children are
//! anchored: rendering walks the children in source order, and every non-content slot is
//! filled by the child the order names for it.

use crate::assessml::ast::{Node, Shuffle, Tree};

/// Positions of the non-content nodes in `children`.
pub fn slots_of(children: &[Node]) -> Vec<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, child)| !child.is_content())
        .map(|(index, _)| index)
        .collect()
}

/// True when `order` is a permutation of exactly `slots`.
pub fn is_valid_order(order: &[usize], slots: &[usize]) -> bool {
    if order.len() != slots.len() {
        return false;
    }
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    sorted == slots
}

/// Translate an order expressed against `old_slots` into the matching `new_slots`.
///
/// The k-th old slot maps to the k-th new slot. Indices that are not old slots are kept.
pub fn remap_order(order: &[usize], old_slots: &[usize], new_slots: &[usize]) -> Vec<usize> {
    order
        .iter()
        .map(|index| {
            old_slots
                .iter()
                .position(|slot| slot == index)
                .and_then(|k| new_slots.get(k).copied())
                .unwrap_or(*index)
        })
        .collect()
}

/// The children of `shuffle` in rendering order.
///
/// An order that is not a permutation of the slots renders in source order.
pub fn render_order(shuffle: &Shuffle) -> Vec<&Node> {
    let slots = shuffle.slots();
    if !is_valid_order(&shuffle.shuffled_indices, &slots) {
        tracing::warn!(
            var_name = %shuffle.var_name,
            "invalid shuffle order, rendering in source order"
        );
        return shuffle.children.iter().collect();
    }

    let mut next = shuffle.shuffled_indices.iter();
    shuffle
        .children
        .iter()
        .map(|child| {
            if child.is_content() {
                child
            } else {
                next.next()
                    .and_then(|index| shuffle.children.get(*index))
                    .unwrap_or(child)
            }
        })
        .collect()
}

/// Rebuild `tree` with every shuffle's order set by `order_for(var_name, slots)`.
///
/// Orders that are not permutations of the slots are replaced by the slots themselves.
pub fn assign_shuffle_orders<F>(tree: &[Node], order_for: &mut F) -> Tree
where
    F: FnMut(&str, Vec<usize>) -> Vec<usize>,
{
    tree.iter()
        .map(|node| match node {
            Node::Shuffle(shuffle) => {
                let children = assign_shuffle_orders(&shuffle.children, order_for);
                let slots = slots_of(&children);
                let order = order_for(&shuffle.var_name, slots.clone());
                let order = if is_valid_order(&order, &slots) { order } else { slots };
                Node::shuffle(shuffle.var_name.clone(), children, order)
            }
            other => match other.children() {
                Some(children) => other.with_children(assign_shuffle_orders(children, order_for)),
                None => other.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffle_of(children: Tree, order: Vec<usize>) -> Shuffle {
        Shuffle {
            var_name: "shuffle1".to_string(),
            children,
            shuffled_indices: order,
        }
    }

    #[test]
    fn test_is_valid_order() {
        assert!(is_valid_order(&[3, 1], &[1, 3]));
        assert!(is_valid_order(&[], &[]));
        assert!(!is_valid_order(&[1, 1], &[1, 3]));
        assert!(!is_valid_order(&[0, 1], &[1, 3]));
        assert!(!is_valid_order(&[1], &[1, 3]));
    }

    #[test]
    fn test_render_order_keeps_content_anchored() {
        let shuffle = shuffle_of(
            vec![
                Node::content("Q: "),
                Node::input("input1"),
                Node::content(" or "),
                Node::input("input2"),
                Node::input("input3"),
            ],
            vec![4, 1, 3],
        );
        let names: Vec<_> = render_order(&shuffle)
            .into_iter()
            .map(|n| match n {
                Node::Content(c) => c.content.clone(),
                other => other.var_name().unwrap_or_default().to_string(),
            })
            .collect();
        assert_eq!(names, vec!["Q: ", "input3", " or ", "input1", "input2"]);
    }

    #[test]
    fn test_render_order_falls_back_on_invalid_order() {
        let shuffle = shuffle_of(
            vec![Node::input("input1"), Node::input("input2")],
            vec![0, 5],
        );
        let rendered: Vec<_> = render_order(&shuffle).into_iter().cloned().collect();
        assert_eq!(rendered, shuffle.children);
    }

    #[test]
    fn test_remap_order() {
        assert_eq!(remap_order(&[4, 2], &[2, 4], &[1, 3]), vec![3, 1]);
        assert_eq!(remap_order(&[9], &[2, 4], &[1, 3]), vec![9]);
    }

    #[test]
    fn test_assign_shuffle_orders_reaches_nested_shuffles() {
        let inner = Node::shuffle(
            "shuffle2",
            vec![
                Node::input("input1"),
                Node::content("x"),
                Node::input("input2"),
            ],
            vec![],
        );
        let tree = vec![Node::container(
            crate::assessml::ast::NodeKind::Solution,
            "solution1",
            vec![inner],
        )
        .unwrap()];

        let assigned = assign_shuffle_orders(&tree, &mut |_, mut slots| {
            slots.reverse();
            slots
        });
        let shuffle = match &assigned[0].children().unwrap()[0] {
            Node::Shuffle(s) => s.clone(),
            other => panic!("Expected shuffle, got {:?}", other),
        };
        assert_eq!(shuffle.shuffled_indices, vec![2, 0]);
    }

    #[test]
    fn test_assign_shuffle_orders_rejects_bad_orders() {
        let tree = vec![Node::shuffle(
            "shuffle1",
            vec![Node::input("input1"), Node::input("input2")],
            vec![],
        )];
        let assigned = assign_shuffle_orders(&tree, &mut |_, _| vec![7]);
        assert_eq!(
            assigned,
            vec![Node::shuffle(
                "shuffle1",
                vec![Node::input("input1"), Node::input("input2")],
                vec![0, 1],
            )]
        );
    }
}
