use crate::lares::client::FetchError;
use roxmltree::Node;

/// Text content of the first child element called `name`.
pub(crate) fn child_text(node: Node, name: &'static str) -> Result<String, FetchError> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(str::to_string)
        .ok_or(FetchError::MissingElement(name))
}

/// All child elements of `root` called `name`, in document order.
pub(crate) fn elements<'a, 'input>(root: Node<'a, 'input>, name: &'static str) -> impl Iterator<Item = Node<'a, 'input>> {
    root.children().filter(move |child| child.has_tag_name(name))
}
