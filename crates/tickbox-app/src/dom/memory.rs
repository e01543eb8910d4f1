//! An arena-backed DOM for running the views
//! without a browser.
//!
//! Markup goes through a small lenient
//! parser: start/end tags, quoted or bare
//! attributes, void elements, comments and
//! character references. Form control state
//! (`value`, `checked`) lives in properties
//! seeded from the attributes, the way a
//! browser keeps it.
//!
//! Replaced or removed subtrees go back to
//! a free list and their slots are reused,
//! so a handle to such a node must not be
//! used afterwards.

use std::fmt::Write as _;

use anyhow::anyhow;
use tracing::trace;

use super::Dom;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

const HIDDEN_STYLE: &str = "display: none;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Kind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        value: Option<String>,
        checked: bool,
    },
    Text(String),
    Vacant,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: Kind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct VirtualDom {
    nodes: Vec<NodeData>,
    free: Vec<NodeId>,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for VirtualDom {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDom {
    pub fn new() -> Self {
        let body = NodeData {
            kind: Kind::Element {
                tag: "body".to_string(),
                attrs: vec![],
                value: None,
                checked: false,
            },
            parent: None,
            children: vec![],
        };
        Self {
            nodes: vec![body],
            free: vec![],
            body: NodeId(0),
            focused: None,
        }
    }

    /// A document whose body holds `html`.
    pub fn from_html(html: &str) -> anyhow::Result<Self> {
        let mut dom = Self::new();
        let body = dom.body;
        dom.set_inner_html(&body, html)?;
        Ok(dom)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Nodes currently allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            Kind::Element { tag, .. } => Some(tag),
            Kind::Text(_) | Kind::Vacant => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|data| {
                data.children
                    .iter()
                    .copied()
                    .filter(|child| self.tag(*child).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Concatenated text of all descendants.
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(data) = self.nodes.get(node.0) {
            for child in &data.children {
                self.serialize(*child, &mut out);
            }
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize(node, &mut out);
        out
    }

    fn data(&self, node: NodeId) -> anyhow::Result<&NodeData> {
        self.nodes
            .get(node.0)
            .filter(|data| !matches!(data.kind, Kind::Vacant))
            .ok_or_else(|| anyhow!("unknown node {}", node.0))
    }

    fn data_mut(&mut self, node: NodeId) -> anyhow::Result<&mut NodeData> {
        self.nodes
            .get_mut(node.0)
            .filter(|data| !matches!(data.kind, Kind::Vacant))
            .ok_or_else(|| anyhow!("unknown node {}", node.0))
    }

    fn attrs_mut(&mut self, node: NodeId) -> anyhow::Result<&mut Vec<(String, String)>> {
        match &mut self.data_mut(node)?.kind {
            Kind::Element { attrs, .. } => Ok(attrs),
            Kind::Text(_) | Kind::Vacant => Err(anyhow!("node {} is not an element", node.0)),
        }
    }

    fn push_node(&mut self, kind: Kind, parent: Option<NodeId>) -> NodeId {
        let data = NodeData {
            kind,
            parent,
            children: vec![],
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot.0] = data;
                slot
            }
            None => {
                self.nodes.push(data);
                NodeId(self.nodes.len() - 1)
            }
        };
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn detach(&mut self, node: NodeId) -> anyhow::Result<()> {
        let Some(parent) = self.data(node)?.parent else {
            return Ok(());
        };
        self.data_mut(parent)?.children.retain(|child| *child != node);
        self.data_mut(node)?.parent = None;
        if self.focused.is_some_and(|focused| self.is_within(focused, node)) {
            self.focused = None;
        }
        Ok(())
    }

    /// Detaches `node` and hands its whole subtree back to the free list.
    fn release(&mut self, node: NodeId) -> anyhow::Result<()> {
        if node == self.body {
            return Err(anyhow!("cannot release the body"));
        }
        self.detach(node)?;
        let mut doomed = self.descendants(node);
        doomed.push(node);
        if self.focused.is_some_and(|focused| doomed.contains(&focused)) {
            self.focused = None;
        }
        for id in doomed {
            self.nodes[id.0] = NodeData {
                kind: Kind::Vacant,
                parent: None,
                children: vec![],
            };
            self.free.push(id);
        }
        Ok(())
    }

    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(scope.0)
            .map(|data| data.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, chain: &[Simple]) -> bool {
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !self.matches_simple(node, last) {
            return false;
        }

        let mut pending = ancestors.len();
        let mut cursor = self.parent(node);
        while pending > 0 {
            let Some(current) = cursor else {
                return false;
            };
            if self.matches_simple(current, &ancestors[pending - 1]) {
                pending -= 1;
            }
            cursor = self.parent(current);
        }
        true
    }

    fn matches_simple(&self, node: NodeId, simple: &Simple) -> bool {
        let Kind::Element { tag, attrs, .. } = &self.nodes[node.0].kind else {
            return false;
        };
        if simple.tag.as_deref().is_some_and(|want| want != tag.as_str()) {
            return false;
        }
        let attr = |name: &str| {
            attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };
        if let Some(want) = &simple.id
            && attr("id") != Some(want.as_str())
        {
            return false;
        }
        let classes: Vec<&str> = attr("class").unwrap_or_default().split_whitespace().collect();
        simple
            .classes
            .iter()
            .all(|class| classes.contains(&class.as_str()))
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            Kind::Text(text) => out.push_str(text),
            Kind::Vacant => {}
            Kind::Element { .. } => {
                for child in &data.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            Kind::Text(text) => out.push_str(&escape_text(text)),
            Kind::Vacant => {}
            Kind::Element { tag, attrs, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &data.children {
                    self.serialize(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn parse_into(&mut self, parent: NodeId, html: &str) {
        let mut stack = vec![parent];
        let mut rest = html;

        while !rest.is_empty() {
            let current = *stack.last().unwrap_or(&parent);

            if let Some(after) = rest.strip_prefix("<!--") {
                rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                continue;
            }

            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').unwrap_or(after.len());
                let name = after[..end].trim().to_ascii_lowercase();
                if let Some(pos) = stack
                    .iter()
                    .rposition(|open| *open != parent && self.tag(*open) == Some(name.as_str()))
                {
                    stack.truncate(pos);
                }
                rest = after.get(end + 1..).unwrap_or("");
                continue;
            }

            if rest.starts_with('<')
                && rest[1..].starts_with(|ch: char| ch.is_ascii_alphabetic())
            {
                let (tag, attrs, self_closing, after) = parse_start_tag(&rest[1..]);
                rest = after;
                let value = attrs
                    .iter()
                    .find(|(name, _)| name == "value")
                    .map(|(_, value)| value.clone());
                let checked = attrs.iter().any(|(name, _)| name == "checked");
                let void = VOID_ELEMENTS.contains(&tag.as_str());
                let node = self.push_node(
                    Kind::Element {
                        tag,
                        attrs,
                        value,
                        checked,
                    },
                    Some(current),
                );
                if !void && !self_closing {
                    stack.push(node);
                }
                continue;
            }

            let skip = usize::from(rest.starts_with('<'));
            let end = rest[skip..].find('<').map_or(rest.len(), |pos| pos + skip);
            let text = decode_entities(&rest[..end]);
            if !text.is_empty() {
                self.push_node(Kind::Text(text), Some(current));
            }
            rest = &rest[end..];
        }
    }
}

impl Dom for VirtualDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let selector = [Simple {
            tag: None,
            id: Some(id.to_string()),
            classes: vec![],
        }];
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.matches(*node, &selector))
    }

    fn create_element(&mut self, tag: &str) -> anyhow::Result<NodeId> {
        let tag = tag.trim().to_ascii_lowercase();
        if tag.is_empty() || !tag.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(anyhow!("invalid tag name: {tag:?}"));
        }
        Ok(self.push_node(
            Kind::Element {
                tag,
                attrs: vec![],
                value: None,
                checked: false,
            },
            None,
        ))
    }

    fn query_all(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        let chain = parse_selector(selector);
        if chain.is_empty() {
            return vec![];
        }
        self.descendants(*scope)
            .into_iter()
            .filter(|node| self.matches(*node, &chain))
            .collect()
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) -> anyhow::Result<()> {
        if self.tag(*node).is_none() {
            return Err(anyhow!("node {} is not an element", node.0));
        }
        for child in self.data(*node)?.children.clone() {
            self.release(child)?;
        }
        self.parse_into(*node, html);
        trace!(node = node.0, len = html.len(), "replaced inner html");
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> anyhow::Result<()> {
        if self.tag(*parent).is_none() {
            return Err(anyhow!("node {} is not an element", parent.0));
        }
        if self.is_within(*parent, *child) {
            return Err(anyhow!("cannot append node {} inside itself", child.0));
        }
        self.detach(*child)?;
        self.data_mut(*child)?.parent = Some(*parent);
        self.data_mut(*parent)?.children.push(*child);
        Ok(())
    }

    fn remove(&mut self, node: &NodeId) -> anyhow::Result<()> {
        self.release(*node)
    }

    fn toggle_class(&mut self, node: &NodeId, class: &str, on: bool) -> anyhow::Result<()> {
        let attrs = self.attrs_mut(*node)?;
        let mut classes: Vec<String> = attrs
            .iter()
            .find(|(name, _)| name == "class")
            .map(|(_, value)| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let present = classes.iter().any(|existing| existing == class);
        if on == present {
            return Ok(());
        }
        if on {
            classes.push(class.to_string());
        } else {
            classes.retain(|existing| existing != class);
        }

        let joined = classes.join(" ");
        attrs.retain(|(name, _)| name != "class");
        if !joined.is_empty() {
            attrs.push(("class".to_string(), joined));
        }
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|value| value.split_whitespace().any(|existing| existing == class))
    }

    fn set_shown(&mut self, node: &NodeId, shown: bool) -> anyhow::Result<()> {
        let attrs = self.attrs_mut(*node)?;
        attrs.retain(|(name, _)| name != "style");
        if !shown {
            attrs.push(("style".to_string(), HIDDEN_STYLE.to_string()));
        }
        Ok(())
    }

    fn is_shown(&self, node: &NodeId) -> bool {
        self.attribute(node, "style").as_deref() != Some(HIDDEN_STYLE)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes.get(node.0)?.kind {
            Kind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
            Kind::Text(_) | Kind::Vacant => None,
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> anyhow::Result<()> {
        let attrs = self.attrs_mut(*node)?;
        if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_string();
        } else {
            attrs.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }

    fn value(&self, node: &NodeId) -> String {
        match self.nodes.get(node.0).map(|data| &data.kind) {
            Some(Kind::Element { value, .. }) => value.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, node: &NodeId, next: &str) -> anyhow::Result<()> {
        match &mut self.data_mut(*node)?.kind {
            Kind::Element { value, .. } => {
                *value = Some(next.to_string());
                Ok(())
            }
            Kind::Text(_) | Kind::Vacant => Err(anyhow!("node {} is not an element", node.0)),
        }
    }

    fn checked(&self, node: &NodeId) -> bool {
        matches!(
            self.nodes.get(node.0).map(|data| &data.kind),
            Some(Kind::Element { checked: true, .. })
        )
    }

    fn set_checked(&mut self, node: &NodeId, next: bool) -> anyhow::Result<()> {
        match &mut self.data_mut(*node)?.kind {
            Kind::Element { checked, .. } => {
                *checked = next;
                Ok(())
            }
            Kind::Text(_) | Kind::Vacant => Err(anyhow!("node {} is not an element", node.0)),
        }
    }

    fn focus(&mut self, node: &NodeId) -> anyhow::Result<()> {
        if self.tag(*node).is_none() {
            return Err(anyhow!("node {} is not an element", node.0));
        }
        self.focused = Some(*node);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Simple {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

fn parse_selector(selector: &str) -> Vec<Simple> {
    let mut chain = Vec::new();
    for part in selector.split_whitespace() {
        let mut simple = Simple {
            tag: None,
            id: None,
            classes: vec![],
        };
        let mut marker = None;
        let mut buf = String::new();
        for ch in part.chars().chain(std::iter::once('\0')) {
            if matches!(ch, '#' | '.' | '\0') {
                if !buf.is_empty() {
                    let name = std::mem::take(&mut buf);
                    match marker {
                        Some('#') => simple.id = Some(name),
                        Some(_) => simple.classes.push(name),
                        None => simple.tag = Some(name.to_ascii_lowercase()),
                    }
                } else if marker.is_some() {
                    return vec![];
                }
                marker = Some(ch);
            } else {
                buf.push(ch);
            }
        }
        chain.push(simple);
    }
    chain
}

/// Returns `(tag, attrs, self_closing, rest)`
/// for input just past the `<`.
fn parse_start_tag(input: &str) -> (String, Vec<(String, String)>, bool, &str) {
    let name_end = input
        .find(|ch: char| ch.is_whitespace() || ch == '>' || ch == '/')
        .unwrap_or(input.len());
    let tag = input[..name_end].to_ascii_lowercase();
    let mut rest = &input[name_end..];
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix("/>") {
            self_closing = true;
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('>') {
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }

        let name_end = rest
            .find(|ch: char| ch.is_whitespace() || matches!(ch, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            if let Some(quote) = after.chars().next().filter(|ch| *ch == '"' || *ch == '\'') {
                let body = &after[1..];
                let end = body.find(quote).unwrap_or(body.len());
                value = decode_entities(&body[..end]);
                rest = body.get(end + 1..).unwrap_or("");
            } else {
                let end = after
                    .find(|ch: char| ch.is_whitespace() || ch == '>')
                    .unwrap_or(after.len());
                value = decode_entities(&after[..end]);
                rest = &after[end..];
            }
        }

        if !attrs.iter().any(|(existing, _)| *existing == name) {
            attrs.push((name, value));
        }
    }

    (tag, attrs, self_closing, rest)
}

fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_markup_and_void_elements() {
        let dom = VirtualDom::from_html(
            r#"<ul id="list"><li class="a b"><input class="edit" value="x &amp; y"><label>hi</label></li></ul>"#,
        )
        .unwrap();
        let list = dom.element_by_id("list").unwrap();
        let items = dom.query_all(&list, "li");
        assert_eq!(items.len(), 1);

        let li = items[0];
        assert_eq!(dom.children(li).len(), 2);
        let edit = dom.query(&li, ".edit").unwrap();
        assert_eq!(dom.value(&edit), "x & y");
        assert_eq!(dom.text(li), "hi");
    }

    #[test]
    fn descendant_selectors_respect_ancestry() {
        let dom = VirtualDom::from_html(
            r##"<footer id="f"><ul id="filters"><li><a href="#/">All</a></li></ul><a href="#/x">Other</a></footer>"##,
        )
        .unwrap();
        let footer = dom.element_by_id("f").unwrap();
        let links = dom.query_all(&footer, "#filters li a");
        assert_eq!(links.len(), 1);
        assert_eq!(dom.attribute(&links[0], "href").as_deref(), Some("#/"));
        assert_eq!(dom.query_all(&footer, "a").len(), 2);
        assert!(dom.query_all(&footer, "#filters .").is_empty());
    }

    #[test]
    fn class_toggling_is_idempotent() {
        let mut dom = VirtualDom::new();
        let li = dom.create_element("li").unwrap();
        dom.toggle_class(&li, "completed", true).unwrap();
        dom.toggle_class(&li, "completed", true).unwrap();
        dom.toggle_class(&li, "hidden", true).unwrap();
        assert_eq!(dom.attribute(&li, "class").as_deref(), Some("completed hidden"));

        dom.toggle_class(&li, "completed", false).unwrap();
        assert!(!dom.has_class(&li, "completed"));
        assert!(dom.has_class(&li, "hidden"));
    }

    #[test]
    fn properties_shadow_attributes() {
        let mut dom =
            VirtualDom::from_html(r#"<input id="t" type="checkbox" checked value="a">"#).unwrap();
        let input = dom.element_by_id("t").unwrap();
        assert!(dom.checked(&input));

        dom.set_checked(&input, false).unwrap();
        dom.set_value(&input, "b").unwrap();
        assert!(!dom.checked(&input));
        assert_eq!(dom.value(&input), "b");
        assert_eq!(dom.attribute(&input, "value").as_deref(), Some("a"));
    }

    #[test]
    fn removed_nodes_leave_the_document() {
        let mut dom = VirtualDom::from_html(r#"<ul id="list"></ul>"#).unwrap();
        let list = dom.element_by_id("list").unwrap();
        let li = dom.create_element("li").unwrap();
        dom.set_attribute(&li, "id", "row").unwrap();
        dom.append_child(&list, &li).unwrap();
        dom.focus(&li).unwrap();
        assert_eq!(dom.element_by_id("row"), Some(li));

        dom.remove(&li).unwrap();
        assert_eq!(dom.element_by_id("row"), None);
        assert_eq!(dom.focused(), None);
        assert_eq!(dom.inner_html(list), "");
    }

    #[test]
    fn rerenders_reuse_released_slots() {
        let mut dom = VirtualDom::from_html(r#"<footer id="f"></footer>"#).unwrap();
        let footer = dom.element_by_id("f").unwrap();
        let markup = r##"<span id="count"><strong>2</strong> items left</span><ul><li><a href="#/">All</a></li></ul>"##;

        dom.set_inner_html(&footer, markup).unwrap();
        let settled = dom.node_count();
        for _ in 0..200 {
            dom.set_inner_html(&footer, markup).unwrap();
        }
        assert_eq!(dom.node_count(), settled);
        assert_eq!(dom.nodes.len(), settled);
        assert_eq!(dom.inner_html(footer), markup);
    }

    #[test]
    fn removed_subtrees_are_released_once() {
        let mut dom = VirtualDom::from_html(r#"<ul id="list"></ul>"#).unwrap();
        let list = dom.element_by_id("list").unwrap();
        let before = dom.node_count();
        let li = dom.create_element("li").unwrap();
        dom.set_inner_html(&li, "<label>x</label>").unwrap();
        dom.append_child(&list, &li).unwrap();

        dom.remove(&li).unwrap();
        assert_eq!(dom.node_count(), before);
        assert!(dom.remove(&li).is_err());
        assert!(dom.toggle_class(&li, "done", true).is_err());
        assert_eq!(dom.node_count(), before);
    }

    #[test]
    fn serializes_back_to_markup() {
        let html = r#"<section id="main" style="display: none;"><input id="toggle-all" type="checkbox"><ul id="todo-list"><li>a &lt; b</li></ul></section>"#;
        let dom = VirtualDom::from_html(html).unwrap();
        assert_eq!(dom.inner_html(dom.body()), html);
        let main = dom.element_by_id("main").unwrap();
        assert!(!dom.is_shown(&main));
    }

    #[test]
    fn stray_markup_is_tolerated() {
        let dom = VirtualDom::from_html("a < b </p><!-- note -->&bogus; <i>x").unwrap();
        assert_eq!(dom.text(dom.body()), "a < b &bogus; x");
    }
}
