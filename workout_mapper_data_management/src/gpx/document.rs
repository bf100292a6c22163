use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::ReadError;

pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

const GPX: &str = "gpx";
const TRK: &str = "trk";
const TRKSEG: &str = "trkseg";
const TRKPT: &str = "trkpt";
const NAME: &str = "name";
const TIME: &str = "time";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace() == Some(namespace) && self.local_name == local_name
    }

    /// Value of an attribute without a namespace prefix.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text content of this element and all of its descendants, in document order.
    pub fn value(&self) -> String {
        let mut value = String::new();
        self.collect_text(&mut value);
        value
    }

    fn collect_text(&self, value: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => value.push_str(text),
                Node::Element(element) => element.collect_text(value),
            }
        }
    }

    /// All elements below this one in document order, excluding itself.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    fn descendants_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |element| element.is(GPX_NAMESPACE, local_name))
    }
}

pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(Node::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }

        None
    }
}

/// A parsed GPX 1.1 document. The root is guaranteed to be `gpx` in the GPX 1.1 namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxDocument {
    root: Element,
}

impl GpxDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, ReadError> {
        let mut reader = NsReader::from_reader(bytes);
        let mut buf = Vec::new();

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;

            match event {
                Event::Start(start) => {
                    let namespace = resolve_namespace(resolved)?;
                    open.push(open_element(namespace, &start, reader.decoder())?);
                }
                Event::Empty(start) => {
                    let namespace = resolve_namespace(resolved)?;
                    let element = open_element(namespace, &start, reader.decoder())?;
                    close_element(element, &mut open, &mut root)?;
                }
                Event::End(_) => {
                    let element = open.pop().ok_or(ReadError::Incomplete)?;
                    close_element(element, &mut open, &mut root)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = open.last_mut() {
                        parent.children.push(Node::Text(text.unescape()?.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = open.last_mut() {
                        parent.children.push(Node::Text(reader.decoder().decode(&data)?.into_owned()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }

            buf.clear();
        }

        if !open.is_empty() {
            return Err(ReadError::Incomplete);
        }

        let root = root.ok_or(ReadError::Incomplete)?;

        if !root.is(GPX_NAMESPACE, GPX) {
            return Err(ReadError::UnexpectedRoot {
                namespace: root.namespace,
                local_name: root.local_name,
            });
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn resolve_namespace(resolved: ResolveResult) -> Result<Option<String>, ReadError> {
    match resolved {
        ResolveResult::Bound(namespace) => Ok(Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ReadError::UnknownPrefix(String::from_utf8_lossy(&prefix).into_owned())),
    }
}

/// Attribute values are decoded with the encoding the document declares.
fn open_element(namespace: Option<String>, start: &BytesStart, decoder: Decoder) -> Result<Element, ReadError> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;

        // Namespace declarations and prefixed attributes are not part of the GPX point contract.
        if attribute.key.prefix().is_some() || attribute.key.as_ref() == b"xmlns" {
            continue;
        }

        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let decoded = decoder.decode(&attribute.value)?;
        let value = unescape(&decoded).map_err(quick_xml::Error::from)?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        namespace,
        local_name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
    })
}

fn close_element(element: Element, open: &mut [Element], root: &mut Option<Element>) -> Result<(), ReadError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(ReadError::MultipleRoots),
    }

    Ok(())
}

pub fn track_elements(document: &GpxDocument) -> impl Iterator<Item = &Element> {
    document.root().descendants_named(TRK)
}

pub fn segment_elements(track: &Element) -> impl Iterator<Item = &Element> {
    track.descendants_named(TRKSEG)
}

pub fn point_elements(segment: &Element) -> impl Iterator<Item = &Element> {
    segment.descendants_named(TRKPT)
}

pub fn name_element(track: &Element) -> Option<&Element> {
    track.descendants_named(NAME).next()
}

pub fn time_element(point: &Element) -> Option<&Element> {
    point.descendants_named(TIME).next()
}
