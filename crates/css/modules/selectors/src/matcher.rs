//! CSS selector matching engine.
//! Reference: <https://www.w3.org/TR/selectors-3/>

use crate::{
    Combinator, ComplexSelector, CompoundSelector, ElementAdapter, SelectorList, SimpleSelector,
};

/// Match a selector list against an element.
/// Selectors 3, section 3, 4
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|selector_item| matches_complex(adapter, element, selector_item))
}

/// Match a complex selector against an element.
/// Selectors 3, section 3, 11: right-to-left matching with backtracking over
/// ancestors and previous siblings.
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
) -> bool {
    matches_from(adapter, element, sel, sel.rest.len())
}

/// Compound at `position` in the left-to-right sequence `first, rest[0], ...`.
fn compound_at(sel: &ComplexSelector, position: usize) -> Option<&CompoundSelector> {
    if position == 0 {
        return Some(&sel.first);
    }
    sel.rest
        .get(position.saturating_sub(1))
        .map(|(_, compound)| compound)
}

fn matches_from<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
    position: usize,
) -> bool {
    let Some(compound) = compound_at(sel, position) else {
        return false;
    };
    if !matches_compound(adapter, element, compound) {
        return false;
    }
    let Some(left) = position.checked_sub(1) else {
        return true;
    };
    let Some(&(combinator, _)) = sel.rest.get(left) else {
        return false;
    };
    match combinator {
        Combinator::Descendant => {
            let mut current = adapter.parent(element);
            while let Some(ancestor) = current {
                if matches_from(adapter, ancestor, sel, left) {
                    return true;
                }
                current = adapter.parent(ancestor);
            }
            false
        }
        Combinator::Child => adapter
            .parent(element)
            .is_some_and(|parent| matches_from(adapter, parent, sel, left)),
        Combinator::AdjacentSibling => adapter
            .previous_sibling_element(element)
            .is_some_and(|sibling| matches_from(adapter, sibling, sel, left)),
        Combinator::GeneralSibling => {
            let mut current = adapter.previous_sibling_element(element);
            while let Some(sibling) = current {
                if matches_from(adapter, sibling, sel, left) {
                    return true;
                }
                current = adapter.previous_sibling_element(sibling);
            }
            false
        }
    }
}

/// Match a compound selector against a single element.
/// Selectors 3, section 5-8
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
) -> bool {
    compound.simples.iter().all(|simple| match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => adapter.tag_name(element) == type_name,
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => adapter
            .element_id(element)
            .is_some_and(|value| value == id_value),
        SimpleSelector::AttrExists(name) => adapter.attr(element, name).is_some(),
        SimpleSelector::AttrEquals { name, value } => adapter
            .attr(element, name)
            .is_some_and(|attr_value| attr_value == value),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]

    use super::*;
    use crate::parse_selector_list;

    /// Flat test tree: index is the handle.
    struct Node {
        tag: &'static str,
        id: Option<&'static str>,
        classes: &'static [&'static str],
        parent: Option<usize>,
        prev: Option<usize>,
    }

    struct Tree(Vec<Node>);

    impl ElementAdapter for Tree {
        type Handle = usize;

        fn parent(&self, element: usize) -> Option<usize> {
            self.0[element].parent
        }

        fn previous_sibling_element(&self, element: usize) -> Option<usize> {
            self.0[element].prev
        }

        fn tag_name(&self, element: usize) -> &str {
            self.0[element].tag
        }

        fn element_id(&self, element: usize) -> Option<&str> {
            self.0[element].id
        }

        fn has_class(&self, element: usize, class: &str) -> bool {
            self.0[element].classes.contains(&class)
        }

        fn attr(&self, element: usize, name: &str) -> Option<&str> {
            (name == "id").then(|| self.0[element].id).flatten()
        }
    }

    // <div#app.shell>            0
    //   <section.panel>          1
    //     <h2.title/>            2
    //     <p/>                   3
    //   </section>
    //   <section/>               4
    // </div>
    fn sample() -> Tree {
        Tree(vec![
            Node { tag: "div", id: Some("app"), classes: &["shell"], parent: None, prev: None },
            Node { tag: "section", id: None, classes: &["panel"], parent: Some(0), prev: None },
            Node { tag: "h2", id: None, classes: &["title"], parent: Some(1), prev: None },
            Node { tag: "p", id: None, classes: &[], parent: Some(1), prev: Some(2) },
            Node { tag: "section", id: None, classes: &[], parent: Some(0), prev: Some(1) },
        ])
    }

    fn matches(tree: &Tree, element: usize, selector: &str) -> bool {
        matches_selector_list(tree, element, &parse_selector_list(selector).unwrap())
    }

    #[test]
    fn descendant_backtracks_past_first_candidate() {
        let tree = sample();
        // The nearest section is `.panel`, but `div section p` must still
        // consider every ancestor for `div`.
        assert!(matches(&tree, 3, "div section p"));
        assert!(matches(&tree, 3, "#app p"));
        assert!(!matches(&tree, 3, "section > div p"));
    }

    #[test]
    fn child_and_sibling_combinators() {
        let tree = sample();
        assert!(matches(&tree, 2, ".panel > .title"));
        assert!(!matches(&tree, 2, "div > .title"));
        assert!(matches(&tree, 3, "h2 + p"));
        assert!(matches(&tree, 4, ".panel ~ section"));
        assert!(!matches(&tree, 1, "section ~ section"));
    }

    #[test]
    fn list_matches_any_item() {
        let tree = sample();
        assert!(matches(&tree, 4, "h2, #app > section"));
        assert!(matches(&tree, 0, "p, .shell"));
        assert!(!matches(&tree, 0, "p, .panel"));
    }
}
