//! Test utilities shared across the codebase

use url::Url;

use crate::host::HtmlDocument;

/// Page URL used by fixtures
pub fn page_url() -> Url {
    Url::parse("https://example.com/app/index.html").unwrap()
}

/// Body with an element for every selector the fixtures use
pub const FIXTURE_BODY: &str = r#"
<main id="main">
  <h1 class="title">Title</h1>
  <h2>Subtitle</h2>
  <div class="card"><p class="text">Text</p></div>
  <div class="card second">Second</div>
</main>"#;

/// Complete page with `head` inserted into `<head>` and `body` into `<body>`
pub fn html_page(head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head>{}</head><body>{}</body></html>",
        head, body
    )
}

/// Page with one inline style sheet per entry of `sheets`
pub fn document_with_css(sheets: &[&str]) -> HtmlDocument {
    let head: String = sheets
        .iter()
        .map(|css| format!("<style>{}</style>", css))
        .collect();
    HtmlDocument::parse(&html_page(&head, FIXTURE_BODY), page_url()).unwrap()
}
