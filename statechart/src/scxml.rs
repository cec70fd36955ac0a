//! SCXML-subset loader (§6.1): parses the documented subset of SCXML into
//! [`State`] trees. Everything else in the SCXML namespace is ignored.

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use thiserror::Error;

use statechart_core::{ActionName, State, StateName, Transition};

/// Errors produced while parsing an SCXML document.
#[derive(Debug, Error)]
pub enum ScxmlError {
    #[error("XML syntax error: {0}")]
    Xml(String),
    #[error("no <scxml> root element found")]
    MissingRoot,
    #[error("<state>/<final> element is missing its required 'id' attribute")]
    MissingId,
    #[error("unexpected end tag: expected </{expected}>, found </{found}>")]
    MismatchedEnd { expected: String, found: String },
    #[error("unexpected end of document")]
    UnexpectedEof,
    #[error("initial=\"{0}\" does not name a direct child state")]
    UnknownInitialState(StateName),
}

fn xml_err(e: quick_xml::Error) -> ScxmlError {
    ScxmlError::Xml(e.to_string())
}

/// Parse SCXML text into a list of root state definitions, in the order
/// described by §6.1: the state named by `initial` first, remaining
/// `state`/`final` children in document order.
pub fn parse_scxml(xml: &str) -> Result<Vec<State>, ScxmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(xml_err)? {
            XmlEvent::Start(start) => {
                if start.local_name().as_ref() == b"scxml" {
                    let initial = attr(&start, "initial")?;
                    let body = parse_body(&mut reader, b"scxml")?;
                    return reorder(body.children, initial);
                }
                skip_subtree(&mut reader)?;
            }
            XmlEvent::Empty(start) => {
                if start.local_name().as_ref() == b"scxml" {
                    return Ok(Vec::new());
                }
            }
            XmlEvent::Eof => return Err(ScxmlError::MissingRoot),
            _ => {}
        }
    }
}

struct Body {
    children: Vec<State>,
    transitions: Vec<Transition>,
    entries: Vec<ActionName>,
    exits: Vec<ActionName>,
}

/// Parse the direct children of a `scxml`/`state`/`final` element up to its
/// matching end tag. `state`/`final` children become `children`;
/// `transition`/`onentry`/`onexit` children feed the other three fields.
/// Everything else (unsupported SCXML features) is skipped, per §6.1.
fn parse_body(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<Body, ScxmlError> {
    let mut children = Vec::new();
    let mut transitions = Vec::new();
    let mut entries = Vec::new();
    let mut exits = Vec::new();

    loop {
        match reader.read_event().map_err(xml_err)? {
            XmlEvent::Start(start) => match start.local_name().as_ref() {
                b"state" => children.push(parse_state(reader, &start, false)?),
                b"final" => children.push(parse_state(reader, &start, true)?),
                b"transition" => transitions.push(parse_transition(reader, &start, false)?),
                b"onentry" => {
                    let text = read_text_content(reader, b"onentry")?;
                    if !text.is_empty() {
                        entries.push(text);
                    }
                }
                b"onexit" => {
                    let text = read_text_content(reader, b"onexit")?;
                    if !text.is_empty() {
                        exits.push(text);
                    }
                }
                _ => skip_subtree(reader)?,
            },
            XmlEvent::Empty(start) => match start.local_name().as_ref() {
                b"state" => children.push(parse_state(reader, &start, false)?),
                b"final" => children.push(parse_state(reader, &start, true)?),
                b"transition" => transitions.push(parse_transition(reader, &start, true)?),
                // A self-closing <onentry/>/<onexit/> has empty text and is ignored (§6.1).
                _ => {}
            },
            XmlEvent::End(end) => {
                let found = end.local_name();
                if found.as_ref() == end_tag {
                    break;
                }
                return Err(ScxmlError::MismatchedEnd {
                    expected: String::from_utf8_lossy(end_tag).into_owned(),
                    found: String::from_utf8_lossy(found.as_ref()).into_owned(),
                });
            }
            XmlEvent::Eof => return Err(ScxmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(Body {
        children,
        transitions,
        entries,
        exits,
    })
}

fn parse_state(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    is_final: bool,
) -> Result<State, ScxmlError> {
    let name = attr(start, "id")?.ok_or(ScxmlError::MissingId)?;
    let initial = attr(start, "initial")?;

    let own_tag: &[u8] = if is_final { b"final" } else { b"state" };
    let body = parse_body(reader, own_tag)?;
    let children = reorder(body.children, initial)?;

    Ok(State {
        name,
        children,
        transitions: body.transitions,
        entries: body.entries,
        exits: body.exits,
        is_final,
    })
}

fn parse_transition(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    self_closing: bool,
) -> Result<Transition, ScxmlError> {
    let event = attr(start, "event")?.unwrap_or_default();
    let target = attr(start, "target")?;
    let conditions = attr(start, "cond")?
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    let internal = attr(start, "type")?.as_deref() == Some("internal");

    let actions = if self_closing {
        Vec::new()
    } else {
        read_text_content(reader, b"transition")?
            .split_whitespace()
            .map(str::to_string)
            .collect()
    };

    Ok(Transition {
        event,
        target,
        actions,
        conditions,
        internal,
    })
}

/// Accumulate the text content of an element up to its matching end tag.
/// Any unexpected child elements are skipped; per §6.1, `onentry`/`onexit`/
/// `transition` text content is expected to be a single flat run of text.
fn read_text_content(reader: &mut Reader<&[u8]>, own_tag: &[u8]) -> Result<String, ScxmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            XmlEvent::Text(bytes) => text.push_str(&bytes.unescape().map_err(xml_err)?),
            XmlEvent::CData(bytes) => {
                text.push_str(&String::from_utf8_lossy(&bytes.into_inner()))
            }
            XmlEvent::Start(_) => skip_subtree(reader)?,
            XmlEvent::Empty(_) => {}
            XmlEvent::End(end) => {
                let found = end.local_name();
                if found.as_ref() == own_tag {
                    return Ok(text.trim().to_string());
                }
                return Err(ScxmlError::MismatchedEnd {
                    expected: String::from_utf8_lossy(own_tag).into_owned(),
                    found: String::from_utf8_lossy(found.as_ref()).into_owned(),
                });
            }
            XmlEvent::Eof => return Err(ScxmlError::UnexpectedEof),
            _ => {}
        }
    }
}

/// Consume a balanced element subtree whose opening `Start` has already
/// been read, discarding its contents.
fn skip_subtree(reader: &mut Reader<&[u8]>) -> Result<(), ScxmlError> {
    let mut depth = 1u32;
    loop {
        match reader.read_event().map_err(xml_err)? {
            XmlEvent::Start(_) => depth += 1,
            XmlEvent::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            XmlEvent::Eof => return Err(ScxmlError::UnexpectedEof),
            _ => {}
        }
    }
}

/// §6.1's ordering rule: the state named by `initial` goes first, the rest
/// keep document order. Applies recursively at every nesting level, not
/// just at the document root (per `original_source`'s `_parse_scxml_states`
/// being called for every state element, not only the root).
fn reorder(mut children: Vec<State>, initial: Option<StateName>) -> Result<Vec<State>, ScxmlError> {
    if children.is_empty() {
        return Ok(children);
    }
    if let Some(name) = initial {
        let position = children
            .iter()
            .position(|state| state.name == name)
            .ok_or(ScxmlError::UnknownInitialState(name))?;
        let initial_state = children.remove(position);
        children.insert(0, initial_state);
    }
    Ok(children)
}

fn attr(start: &BytesStart, name: &str) -> Result<Option<String>, ScxmlError> {
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ScxmlError::Xml(e.to_string()))?;
        let key = attribute.key.local_name();
        if key.as_ref() == name.as_bytes() {
            let value = attribute.unescape_value().map_err(xml_err)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
