use select::document::Document;
use select::predicate::Name;
use serde::{Deserialize, Serialize};

/// Structural counts taken from a fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub links_count: usize,
    pub images_count: usize,
}

/// Counts every `<a>` and `<img>` element in `body`, however deeply nested.
///
/// Parsing is html5ever's error-recovering tree builder, so broken markup still
/// yields a best-effort count and an empty body yields zeros.
pub fn extract_metadata(body: &str) -> PageMetadata {
    if body.trim().is_empty() {
        return PageMetadata::default();
    }

    let document = Document::from(body);
    PageMetadata {
        links_count: document.find(Name("a")).count(),
        images_count: document.find(Name("img")).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_links_and_images() {
        let html = r#"
            <html>
              <body>
                <a href='#'>Link 1</a>
                <a href='#'>Link 2</a>
                <img src='image1.jpg'>
                <img src='image2.jpg'>
                <img src='image3.jpg'>
                Hello World
              </body>
            </html>
        "#;
        assert_eq!(
            extract_metadata(html),
            PageMetadata {
                links_count: 2,
                images_count: 3
            }
        );
    }

    #[test]
    fn counts_nested_elements() {
        let html = "<div><p><a href='/x'><img src='a.png'></a></p><ul><li><a>y</a></li></ul></div>";
        let meta = extract_metadata(html);
        assert_eq!(meta.links_count, 2);
        assert_eq!(meta.images_count, 1);
    }

    #[test]
    fn tolerates_broken_markup() {
        let meta = extract_metadata("<a href='x'>unclosed <img src=y <div><a>");
        assert!(meta.links_count >= 1);
    }

    #[test]
    fn empty_and_plain_text_bodies_are_zero() {
        assert_eq!(extract_metadata(""), PageMetadata::default());
        assert_eq!(extract_metadata("just some text"), PageMetadata::default());
        assert_eq!(extract_metadata("{\"json\": true}"), PageMetadata::default());
    }
}
