//! Comprehensive tests for fos-html
//!
//! Document parsing and innerHTML assignment on the resulting tree.

use fos_html::{set_inner_html, Document, HtmlParser, ParseError};

fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html).expect("parse")
}

#[test]
fn test_parse_minimal_html() {
    let doc = parse("");
    assert!(doc.tree().len() >= 1, "Even empty HTML should have root");
    assert!(doc.body().is_valid(), "html5ever always synthesizes a body");
}

#[test]
fn test_parse_with_attributes() {
    let doc = parse(r#"<div id="main" class="container primary" data-value="123"><a href="https://example.com">Link</a></div>"#);
    let main = doc.get_element_by_id("main").unwrap();

    let elem = doc.tree().element(main).unwrap();
    assert_eq!(elem.get_attr("data-value"), Some("123"));
    assert!(doc.has_class(main, "primary").unwrap());
    assert_eq!(doc.query_selector_all("#main > a[href]").unwrap().len(), 1);
}

#[test]
fn test_parse_drops_whitespace_only_text() {
    let doc = parse("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
    let ul = doc.query_selector("ul").unwrap().unwrap();
    assert_eq!(doc.inner_html(ul).unwrap(), "<li>a</li><li>b</li>");
}

#[test]
fn test_parse_entities_round_trip() {
    let doc = parse("<p>&lt;tag&gt; &amp; &quot;quotes&quot;</p>");
    let p = doc.query_selector("p").unwrap().unwrap();
    assert_eq!(doc.inner_html(p).unwrap(), "&lt;tag&gt; &amp; \"quotes\"");
}

#[test]
fn test_parse_script_is_raw() {
    let doc = parse("<script>if (a < b) { x = '<div>'; }</script>");
    let script = doc.query_selector("script").unwrap().unwrap();
    assert_eq!(doc.inner_html(script).unwrap(), "if (a < b) { x = '<div>'; }");
    // The string literal did not become an element
    assert!(doc.query_selector_all("div").unwrap().is_empty());
}

#[test]
fn test_parse_large_document() {
    let mut html = String::from("<html><body>");
    for i in 0..1000 {
        html.push_str(&format!(r#"<div id="div-{i}" class="item"><p>Paragraph {i}</p></div>"#));
    }
    html.push_str("</body></html>");

    let doc = parse(&html);
    assert_eq!(doc.query_selector_all(".item > p").unwrap().len(), 1000);
    assert!(doc.get_element_by_id("div-999").is_some());
}

#[test]
fn test_set_inner_html_replaces_children() {
    let mut doc = parse("<h1>Old <em>title</em></h1><p>keep</p>");
    let h1 = doc.query_selector("h1").unwrap().unwrap();

    set_inner_html(&mut doc, h1, "<span class=\"new\">New</span>").unwrap();

    assert_eq!(doc.inner_html(h1).unwrap(), "<span class=\"new\">New</span>");
    assert!(doc.query_selector_all("em").unwrap().is_empty());
    assert_eq!(doc.query_selector_all("h1 > .new").unwrap().len(), 1);
    assert_eq!(doc.query_selector_all("p").unwrap().len(), 1);
}

#[test]
fn test_set_inner_html_plain_text() {
    let mut doc = parse("<h1>x</h1>");
    let h1 = doc.query_selector("h1").unwrap().unwrap();

    set_inner_html(&mut doc, h1, "helllllo").unwrap();
    assert_eq!(doc.inner_html(h1).unwrap(), "helllllo");

    set_inner_html(&mut doc, h1, "").unwrap();
    assert_eq!(doc.inner_html(h1).unwrap(), "");
}

#[test]
fn test_set_inner_html_on_text_node_fails() {
    let mut doc = parse("<h1>x</h1>");
    let h1 = doc.query_selector("h1").unwrap().unwrap();
    let text = doc.tree().children(h1).next().map(|(id, _)| id).unwrap();

    assert!(matches!(
        set_inner_html(&mut doc, text, "<b>y</b>"),
        Err(ParseError::Dom(_))
    ));
}
