//! Topic listing parser.
//!
//! A WCRJ topic page lists article summaries, each wrapped in a container
//! element (by default `<article>`):
//!
//! ```html
//! <article>
//!   <header><h2><a href="/article/1852">Title</a></h2></header>
//!   <div class="article-authors"><a class="author-trigger">A. Rossi</a></div>
//!   <footer>
//!     <a rel="category tag">Haematological Oncology</a>
//!     <a rel="tag">lymphoma</a>
//!   </footer>
//! </article>
//! ```
//!
//! Every field is selected inside its own container, so a page-level footer
//! or an article missing its author block cannot shift data onto the wrong
//! record.

use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default CSS selector for one article summary on the listing page.
pub const DEFAULT_CONTAINER: &str = "article";

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("header h2").unwrap());
static ID_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("header h2 a[href]").unwrap());
static FOOTER: Lazy<Selector> = Lazy::new(|| Selector::parse("footer").unwrap());
static TOPIC: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[rel="category tag"]"#).unwrap());
static CATEGORY: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[rel="tag"]"#).unwrap());
static AUTHOR_SECTION: Lazy<Selector> = Lazy::new(|| Selector::parse(".article-authors").unwrap());
static AUTHOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".author-trigger").unwrap());

/// Compile a user-supplied container selector.
pub fn container_selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid container selector {css:?}: {e}"))
}

/// Extract one [`ArticleRecord`] per article container, in document order.
///
/// `page_url` is the listing URL; relative article links are resolved
/// against it before the identifier is taken from the last path segment.
/// Containers without an article link are skipped.
#[instrument(level = "info", skip_all, fields(page = %page_url))]
pub fn parse_listing(document: &Html, container: &Selector, page_url: &Url) -> Vec<ArticleRecord> {
    let mut articles = Vec::new();
    let mut containers = 0usize;

    for (index, element) in document.select(container).enumerate() {
        containers += 1;
        match parse_container(element, page_url) {
            Some(article) => {
                debug!(index, heading = %article.heading, url_id = ?article.url_id, "Parsed listing entry");
                articles.push(article);
            }
            None => warn!(index, "Listing entry has no article link; skipping"),
        }
    }

    if containers == 0 {
        warn!("No article containers found on listing page");
    }
    info!(count = articles.len(), containers, "Parsed listing page");
    articles
}

fn parse_container(container: ElementRef<'_>, page_url: &Url) -> Option<ArticleRecord> {
    let href = container
        .select(&ID_LINK)
        .find_map(|link| link.value().attr("href"))?;
    let identifier = identifier_from_href(page_url, href)?;

    let heading = container
        .select(&HEADING)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let footer = container.select(&FOOTER).next();
    let topic = footer.map(|f| texts(f, &TOPIC)).unwrap_or_default();
    let categories = footer.map(|f| texts(f, &CATEGORY)).unwrap_or_default();

    let authors = container
        .select(&AUTHOR_SECTION)
        .next()
        .map(|section| texts(section, &AUTHOR))
        .unwrap_or_default();

    Some(ArticleRecord {
        heading,
        topic,
        categories,
        authors,
        url_id: vec![identifier],
    })
}

fn texts(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope
        .select(selector)
        .map(|e| e.text().collect::<String>())
        .collect()
}

/// Last non-empty path segment of `href` resolved against `base`.
pub fn identifier_from_href(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href).ok()?;
    resolved
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <main>
          <article class="post">
            <header><h2><a href="https://www.wcrj.net/article/1852">  CAR-T outcomes in DLBCL
            </a></h2></header>
            <div class="article-authors">
              <a class="author-trigger">A. Rossi</a>, <a class="author-trigger">B. Chen</a>
            </div>
            <footer>
              <a rel="category tag">Haematological Oncology</a>
              <a rel="tag">lymphoma</a><a rel="tag">CAR-T</a>
            </footer>
          </article>
          <article class="post">
            <header><h2><a href="/article/2157/">Myeloma relapse patterns</a></h2></header>
            <footer><a rel="category tag">Haematological Oncology</a></footer>
          </article>
          <article class="post">
            <header><h2>Editorial without link</h2></header>
            <footer><a rel="tag">editorial</a></footer>
          </article>
          <article class="post">
            <header><h2><a href="../article/ABC-9">Leukaemia in children</a></h2></header>
            <div class="article-authors"><span class="author-trigger">C. Diaz</span></div>
            <footer>
              <a rel="category tag">Haematological Oncology</a>
              <a rel="category tag">Paediatrics</a>
            </footer>
          </article>
        </main>
        <footer class="site-footer"><a rel="tag">site-wide</a></footer>
        </body></html>
    "#;

    fn page_url() -> Url {
        Url::parse("https://www.wcrj.net/topic/haematological-oncology").unwrap()
    }

    fn parse(html: &str) -> Vec<ArticleRecord> {
        let document = Html::parse_document(html);
        let container = container_selector(DEFAULT_CONTAINER).unwrap();
        parse_listing(&document, &container, &page_url())
    }

    #[test]
    fn test_parse_listing_in_document_order() {
        let articles = parse(LISTING);
        let ids: Vec<&str> = articles.iter().filter_map(|a| a.identifier()).collect();
        assert_eq!(ids, ["1852", "2157", "ABC-9"]);
    }

    #[test]
    fn test_parse_listing_fields() {
        let articles = parse(LISTING);
        let first = &articles[0];
        assert_eq!(first.heading, "CAR-T outcomes in DLBCL");
        assert_eq!(first.topic, ["Haematological Oncology"]);
        assert_eq!(first.categories, ["lymphoma", "CAR-T"]);
        assert_eq!(first.authors, ["A. Rossi", "B. Chen"]);
        assert_eq!(first.url_id, ["1852"]);
    }

    #[test]
    fn test_missing_sections_do_not_shift_data() {
        let articles = parse(LISTING);
        let second = &articles[1];
        assert_eq!(second.heading, "Myeloma relapse patterns");
        assert!(second.authors.is_empty());
        assert!(second.categories.is_empty());

        let third = &articles[2];
        assert_eq!(third.authors, ["C. Diaz"]);
        assert_eq!(third.topic, ["Haematological Oncology", "Paediatrics"]);
        assert!(third.categories.is_empty());
    }

    #[test]
    fn test_page_footer_is_ignored() {
        let articles = parse(LISTING);
        assert!(
            articles
                .iter()
                .all(|a| !a.categories.iter().any(|c| c == "site-wide"))
        );
    }

    #[test]
    fn test_n_containers_yield_n_records() {
        let block = r#"<article><header><h2><a href="/article/{id}">T{id}</a></h2></header>
            <div class="article-authors"><a class="author-trigger">X</a></div>
            <footer><a rel="tag">t</a></footer></article>"#;
        let body: String = (1..=7).map(|i| block.replace("{id}", &i.to_string())).collect();
        let articles = parse(&format!("<html><body>{body}</body></html>"));
        assert_eq!(articles.len(), 7);
        for (i, article) in articles.iter().enumerate() {
            assert_eq!(article.heading, format!("T{}", i + 1));
        }
    }

    #[test]
    fn test_no_containers() {
        assert!(parse("<html><body><p>Nothing here</p></body></html>").is_empty());
    }

    #[test]
    fn test_custom_container_selector() {
        let html = r#"<div class="entry"><header><h2><a href="/article/77">T</a></h2></header></div>"#;
        let document = Html::parse_document(html);
        let container = container_selector("div.entry").unwrap();
        let articles = parse_listing(&document, &container, &page_url());
        assert_eq!(articles[0].url_id, ["77"]);
    }

    #[test]
    fn test_invalid_container_selector() {
        assert!(container_selector("article[").is_err());
    }

    #[test]
    fn test_identifier_from_href() {
        let base = page_url();
        assert_eq!(
            identifier_from_href(&base, "https://www.wcrj.net/article/1636").as_deref(),
            Some("1636")
        );
        assert_eq!(identifier_from_href(&base, "/article/1636/").as_deref(), Some("1636"));
        assert_eq!(
            identifier_from_href(&base, "/article/1636?ref=topic#abstract").as_deref(),
            Some("1636")
        );
        assert_eq!(identifier_from_href(&base, "https://www.wcrj.net/").as_deref(), None);
    }
}
