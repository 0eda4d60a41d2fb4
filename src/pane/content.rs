use std::collections::VecDeque;
use std::fmt;

/// How deep the fallback search for a focusable element looks below the root
pub const SHALLOW_DEPTH: usize = 2;

/// Name of a sub-element inside a pane, unique within that pane
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node in a pane's content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub focusable: bool,
    /// Disabled elements keep their place in the tree but cannot take focus
    pub enabled: bool,
    pub children: Vec<Element>,
}

impl Element {
    pub fn focusable(id: impl Into<String>) -> Self {
        Element {
            id: ElementId::new(id),
            focusable: true,
            enabled: true,
            children: Vec::new(),
        }
    }

    /// A non-focusable grouping element
    pub fn group(id: impl Into<String>, children: Vec<Element>) -> Self {
        Element {
            id: ElementId::new(id),
            focusable: false,
            enabled: true,
            children,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn can_focus(&self) -> bool {
        self.focusable && self.enabled
    }
}

/// The root of a pane's content. Panes build it once and update it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRoot {
    pub children: Vec<Element>,
}

static EMPTY_ROOT: ContentRoot = ContentRoot {
    children: Vec::new(),
};

impl ContentRoot {
    pub fn new(children: Vec<Element>) -> Self {
        ContentRoot { children }
    }

    pub fn empty() -> &'static ContentRoot {
        &EMPTY_ROOT
    }

    /// Depth-first search of the whole tree
    pub fn find(&self, id: &ElementId) -> Option<&Element> {
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            if &element.id == id {
                return Some(element);
            }
            stack.extend(element.children.iter().rev());
        }
        None
    }

    /// First focusable element in breadth-first order, looking no deeper than
    /// [`SHALLOW_DEPTH`] levels below the root.
    pub fn first_focusable(&self) -> Option<&Element> {
        let mut queue: VecDeque<(&Element, usize)> =
            self.children.iter().map(|e| (e, 1)).collect();
        while let Some((element, depth)) = queue.pop_front() {
            if element.can_focus() {
                return Some(element);
            }
            if depth < SHALLOW_DEPTH {
                queue.extend(element.children.iter().map(|c| (c, depth + 1)));
            }
        }
        None
    }

    /// Focusable elements in depth-first order, for Tab cycling
    pub fn focus_order(&self) -> Vec<&ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            if element.can_focus() {
                out.push(&element.id);
            }
            stack.extend(element.children.iter().rev());
        }
        out
    }

    /// The focusable element after (or before, when `forward` is false) `current`,
    /// wrapping at the ends. Starts at the first element when `current` is not focusable.
    pub fn cycle_focus(&self, current: Option<&ElementId>, forward: bool) -> Option<ElementId> {
        let order = self.focus_order();
        if order.is_empty() {
            return None;
        }
        let len = order.len();
        let next = match current.and_then(|c| order.iter().position(|id| *id == c)) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        Some(order[next].clone())
    }
}

/// Where keyboard focus lands inside a pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    Element(ElementId),
    /// The pane itself, when nothing inside can take focus
    Root,
}

impl FocusTarget {
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            FocusTarget::Element(id) => Some(id),
            FocusTarget::Root => None,
        }
    }
}
