use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Node};

lazy_static! {
    static ref SYMBOL_NAME: Regex = Regex::new(r"[?&]name=([^&]+)").unwrap();
}

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serializes the children of `element`, with symbol images pointed at the
/// local asset directory, `align` attributes dropped and `<i>` written as
/// `<em>`.
pub fn card_text_html(element: ElementRef) -> String {
    let mut out = String::new();
    write_children(element, &mut out);
    out
}

/// Local asset path for a Gatherer symbol image, keyed by its `name=` parameter.
pub fn symbol_asset(src: &str) -> Option<String> {
    SYMBOL_NAME
        .captures(src)
        .map(|caps| format!("/assets/symbols/{}.png", &caps[1]))
}

fn write_children(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_text(text, out),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef, out: &mut String) {
    let value = element.value();
    let name = match value.name() {
        "i" => "em",
        other => other,
    };

    // Attribute storage order is not stable across runs; sort for
    // reproducible output.
    let mut attrs: Vec<(&str, &str)> = value
        .attrs()
        .filter(|(attr, _)| *attr != "align")
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));

    out.push('<');
    out.push_str(name);
    for (attr, attr_value) in attrs {
        let rewritten = if name == "img" && attr == "src" {
            symbol_asset(attr_value)
        } else {
            None
        };
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_attr(rewritten.as_deref().unwrap_or(attr_value), out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(element, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
