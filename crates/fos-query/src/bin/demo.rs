//! fos-query demo
//!
//! Parses a small page, publishes the constructor and edits the headings.
//! Set `RUST_LOG=fos_query=debug` to watch the bootstrap steps.

use anyhow::Context;
use fos_query::{Window, MODULE_NAME, VERSION};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Demo</title></head>
  <body>
    <h1 class="red">Hello</h1>
    <h1>World</h1>
  </body>
</html>"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("{} {}", MODULE_NAME, VERSION);

    let document = fos_html::parse(PAGE).context("parsing demo page")?;
    let window = Window::new(document);
    let jquery = fos_query::initialize(&window)?;

    let h1 = jquery.select("h1")?;
    h1.set_html("helllllo")?.remove_class("red")?.toggle_class("seen")?;

    println!("{} matched {} element(s)", jquery.name(), h1.len());
    for entry in h1.html()? {
        println!("  {} -> {:?}", entry.element, entry.markup);
    }
    println!("first has 'seen': {}", h1.has_class("seen")?);

    Ok(())
}
