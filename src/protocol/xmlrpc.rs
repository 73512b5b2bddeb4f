//! XML-RPC wire codec.
//!
//! Values are carried as `serde_json::Value` so remote results can be handed
//! straight to the JSON surface of the proxy. The mapping is:
//!
//! | JSON            | XML-RPC                                   |
//! |-----------------|-------------------------------------------|
//! | `null`          | `<nil/>`                                  |
//! | `bool`          | `<boolean>`                               |
//! | integer         | `<int>` (`<i8>` outside the i32 range)    |
//! | float           | `<double>`                                |
//! | string          | `<string>` (untyped `<value>` text too)   |
//! | array           | `<array><data>`                           |
//! | object          | `<struct>`                                |
//!
//! `<dateTime.iso8601>` and `<base64>` decode to their raw text.

use super::ProtocolError;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{json, Map, Number, Value};

const XML_DECL: &str = r#"<?xml version="1.0"?>"#;

/// Encode a `<methodCall>` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str("<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

/// Encode a successful `<methodResponse>` carrying one value.
pub fn encode_response(value: &Value) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str("<methodResponse><params><param>");
    write_value(&mut out, value);
    out.push_str("</param></params></methodResponse>");
    out
}

/// Encode a `<fault>` response.
pub fn encode_fault(code: i64, message: &str) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str("<methodResponse><fault>");
    write_value(&mut out, &json!({ "faultCode": code, "faultString": message }));
    out.push_str("</fault></methodResponse>");
    out
}

/// Decode a `<methodResponse>`. A `<fault>` becomes `ProtocolError::Fault`.
pub fn decode_response(xml: &str) -> Result<Value, ProtocolError> {
    let root = parse_document(xml)?;
    if root.name != "methodResponse" {
        return Err(ProtocolError::Decode(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.child("fault") {
        let value = fault
            .child("value")
            .ok_or_else(|| ProtocolError::Decode("<fault> without <value>".to_string()))?;
        let detail = decode_value(value)?;
        let code = detail.get("faultCode").and_then(Value::as_i64).unwrap_or(0);
        let message = detail
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(ProtocolError::Fault { code, message });
    }

    let value = root
        .child("params")
        .and_then(|params| params.child("param"))
        .and_then(|param| param.child("value"))
        .ok_or_else(|| ProtocolError::Decode("response carries no <param> value".to_string()))?;
    decode_value(value)
}

/// Decode a `<methodCall>` into its method name and parameters.
pub fn decode_call(xml: &str) -> Result<(String, Vec<Value>), ProtocolError> {
    let root = parse_document(xml)?;
    if root.name != "methodCall" {
        return Err(ProtocolError::Decode(format!(
            "expected <methodCall>, found <{}>",
            root.name
        )));
    }

    let method = root
        .child("methodName")
        .map(|name| name.text().trim().to_string())
        .ok_or_else(|| ProtocolError::Decode("<methodCall> without <methodName>".to_string()))?;

    let mut params = Vec::new();
    if let Some(list) = root.child("params") {
        for param in list.elements().filter(|e| e.name == "param") {
            let value = param
                .child("value")
                .ok_or_else(|| ProtocolError::Decode("<param> without <value>".to_string()))?;
            params.push(decode_value(value)?);
        }
    }
    Ok((method, params))
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Null => out.push_str("<nil/>"),
        Value::Bool(b) => {
            out.push_str(if *b { "<boolean>1</boolean>" } else { "<boolean>0</boolean>" })
        }
        Value::Number(n) => write_number(out, n),
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Object(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        if i32::try_from(i).is_ok() {
            out.push_str(&format!("<int>{}</int>", i));
        } else {
            out.push_str(&format!("<i8>{}</i8>", i));
        }
    } else if let Some(f) = n.as_f64() {
        out.push_str(&format!("<double>{:?}</double>", f));
    }
}

fn decode_value(el: &Element) -> Result<Value, ProtocolError> {
    let Some(typed) = el.elements().next() else {
        return Ok(Value::String(el.text()));
    };

    match typed.name.as_str() {
        "int" | "i4" | "i8" => {
            let raw = typed.text();
            raw.trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| ProtocolError::Decode(format!("invalid integer '{}'", raw)))
        }
        "boolean" => match typed.text().trim() {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            other => Err(ProtocolError::Decode(format!("invalid boolean '{}'", other))),
        },
        "double" => {
            let raw = typed.text();
            let f = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ProtocolError::Decode(format!("invalid double '{}'", raw)))?;
            Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
        }
        "string" | "dateTime.iso8601" | "base64" => Ok(Value::String(typed.text())),
        "nil" => Ok(Value::Null),
        "array" => {
            let mut items = Vec::new();
            if let Some(data) = typed.child("data") {
                for item in data.elements().filter(|e| e.name == "value") {
                    items.push(decode_value(item)?);
                }
            }
            Ok(Value::Array(items))
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.elements().filter(|e| e.name == "member") {
                let name = member
                    .child("name")
                    .map(Element::text)
                    .ok_or_else(|| ProtocolError::Decode("<member> without <name>".to_string()))?;
                let value = member
                    .child("value")
                    .ok_or_else(|| ProtocolError::Decode(format!("member '{}' has no <value>", name)))?;
                members.insert(name, decode_value(value)?);
            }
            Ok(Value::Object(members))
        }
        other => Err(ProtocolError::Decode(format!("unsupported value type <{}>", other))),
    }
}

// ─── minimal DOM ───

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

fn tag_name(raw: &[u8]) -> Result<String, ProtocolError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| ProtocolError::Decode(format!("non UTF-8 tag name: {}", e)))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), ProtocolError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err(ProtocolError::Decode("multiple root elements".to_string()))
    }
}

fn parse_document(xml: &str) -> Result<Element, ProtocolError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Element::new(tag_name(e.name().as_ref())?)),
            Event::Empty(e) => {
                let el = Element::new(tag_name(e.name().as_ref())?);
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| ProtocolError::Decode("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    current.children.push(Node::Text(t.unescape()?.into_owned()));
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    current.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ProtocolError::Decode("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| ProtocolError::Decode("empty document".to_string()))
}
