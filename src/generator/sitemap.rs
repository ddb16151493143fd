//! Sitemap generation.
//!
//! Lists static pages followed by published posts for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com</loc>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//!   <url>
//!     <loc>https://example.com/blog/hello</loc>
//!     <lastmod>2024-01-01T00:00:00.000Z</lastmod>
//!     <changefreq>monthly</changefreq>
//!     <priority>0.7</priority>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::{ChangeFreq, PostPath, SiteConfig, StaticPage},
    content::{ContentSource, PostRecord},
    error::{DataSourceError, SitemapError},
    log,
    utils::date::to_iso8601,
};
use anyhow::{Context, Result};
use std::{fs, time::Duration};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// MIME type to serve the document with.
pub const CONTENT_TYPE: &str = "application/xml";

/// Every post is listed with the same crawl hints.
const POST_CHANGEFREQ: ChangeFreq = ChangeFreq::Monthly;
const POST_PRIORITY: f32 = 0.7;

// ============================================================================
// Public API
// ============================================================================

/// Build the sitemap document for `config`, reading posts from `source`.
///
/// The configuration is validated first; nothing is fetched if it is invalid.
pub async fn build_sitemap<S: ContentSource>(
    config: &SiteConfig,
    source: &S,
) -> Result<String, SitemapError> {
    config.validate()?;

    let posts = fetch_posts(source, config.content.timeout()).await?;
    let sitemap = Sitemap::from_parts(
        config.base_url()?,
        &config.sitemap.pages,
        config.post_path()?,
        posts,
    )?;

    Ok(sitemap.into_xml(config.sitemap.indent))
}

/// Write a generated document to `[sitemap].output`.
pub fn write_sitemap(config: &SiteConfig, xml: &str) -> Result<()> {
    let sitemap_path = &config.sitemap.output;
    if let Some(parent) = sitemap_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(sitemap_path, xml)
        .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

    log!("sitemap"; "{}", sitemap_path.display());
    Ok(())
}

/// Await the single content fetch, bounded by `timeout`.
async fn fetch_posts<S: ContentSource>(
    source: &S,
    timeout: Duration,
) -> Result<Vec<PostRecord>, DataSourceError> {
    tokio::time::timeout(timeout, source.list_posts())
        .await
        .map_err(|_| DataSourceError::Timeout(timeout))?
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
#[derive(Debug)]
pub struct Sitemap {
    /// Static pages first, then posts
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    /// Full URL location
    pub loc: String,
    /// Last modification instant (optional, ISO-8601 with milliseconds)
    pub lastmod: Option<String>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl UrlEntry {
    fn from_page(base_url: &str, page: &StaticPage) -> Result<Self, SitemapError> {
        page.validate()?;

        let path = page.path.trim_matches('/');
        let loc = if path.is_empty() {
            base_url.to_owned()
        } else {
            format!("{base_url}/{path}")
        };

        Ok(Self {
            loc,
            lastmod: None,
            changefreq: page.changefreq,
            priority: page.priority,
        })
    }

    fn from_post(base_url: &str, post_path: PostPath, post: PostRecord) -> Result<Self, DataSourceError> {
        let published = post
            .published
            .ok_or_else(|| DataSourceError::MissingDate(post.id.clone()))?;

        Ok(Self {
            loc: format!("{base_url}/{}/{}", post_path.as_str(), post.id),
            lastmod: Some(to_iso8601(&published)),
            changefreq: POST_CHANGEFREQ,
            priority: POST_PRIORITY,
        })
    }
}

impl Sitemap {
    /// Assemble entries from already-fetched records.
    ///
    /// Drafts are dropped before anything else looks at a record.
    pub fn from_parts(
        base_url: &str,
        pages: &[StaticPage],
        post_path: PostPath,
        posts: Vec<PostRecord>,
    ) -> Result<Self, SitemapError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SitemapError::config("[base.url] is required"));
        }

        let discovered = posts.len();
        let published: Vec<PostRecord> = posts.into_iter().filter(|p| !p.draft).collect();
        log!(
            "content";
            "{discovered} posts, {} drafts skipped",
            discovered - published.len()
        );

        let mut urls = Vec::with_capacity(pages.len() + published.len());
        for page in pages {
            urls.push(UrlEntry::from_page(base_url, page)?);
        }
        for post in published {
            urls.push(UrlEntry::from_post(base_url, post_path, post)?);
        }

        Ok(Self { urls })
    }

    pub fn urls(&self) -> &[UrlEntry] {
        &self.urls
    }

    /// Generate sitemap XML string.
    ///
    /// With `indent` off, elements follow each other without whitespace.
    pub fn into_xml(self, indent: bool) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 192);

        let line = |xml: &mut String, depth: usize, text: &str| {
            if indent {
                for _ in 0..depth {
                    xml.push_str("  ");
                }
            }
            xml.push_str(text);
            if indent {
                xml.push('\n');
            }
        };

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        line(&mut xml, 0, &format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));

        for entry in self.urls {
            line(&mut xml, 1, "<url>");
            line(&mut xml, 2, &format!("<loc>{}</loc>", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                line(&mut xml, 2, &format!("<lastmod>{lastmod}</lastmod>"));
            }
            line(&mut xml, 2, &format!("<changefreq>{}</changefreq>", entry.changefreq));
            line(&mut xml, 2, &format!("<priority>{}</priority>", format_priority(entry.priority)));
            line(&mut xml, 1, "</url>");
        }

        line(&mut xml, 0, "</urlset>");
        if !indent {
            xml.push('\n');
        }
        xml
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Shortest decimal form, always with a fractional part: `1.0`, `0.8`, `0.75`.
fn format_priority(priority: f32) -> String {
    let s = priority.to_string();
    if s.contains('.') { s } else { format!("{s}.0") }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::defaults, content::MemorySource};
    use chrono::{TimeZone, Utc};
    use quick_xml::{Reader, events::Event};

    const BASE: &str = "https://example.com";

    fn post(id: &str, y: i32, m: u32, d: u32) -> PostRecord {
        PostRecord::new(id, Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    fn config() -> SiteConfig {
        SiteConfig::from_str(
            r#"
            [base]
            url = "https://example.com"

            [sitemap]
            post_path = "blog"
        "#,
        )
        .unwrap()
    }

    /// Parse the whole document, returning the root element name and its
    /// `xmlns` attribute.
    fn parse_root(xml: &str) -> (String, String) {
        let mut reader = Reader::from_str(xml);
        let mut root = None;
        loop {
            match reader.read_event().expect("well-formed xml") {
                Event::Start(e) if root.is_none() => {
                    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                    let ns = e
                        .try_get_attribute("xmlns")
                        .unwrap()
                        .map(|a| String::from_utf8(a.value.to_vec()).unwrap())
                        .unwrap_or_default();
                    root = Some((name, ns));
                }
                Event::Eof => break,
                _ => {}
            }
        }
        root.expect("root element")
    }

    /// Text of every `<tag>` element, in document order.
    fn texts(xml: &str, tag: &str) -> Vec<String> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        xml.split(&open)
            .skip(1)
            .map(|rest| rest.split(&close).next().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_format_priority() {
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.8), "0.8");
        assert_eq!(format_priority(0.7), "0.7");
        assert_eq!(format_priority(0.75), "0.75");
        assert_eq!(format_priority(0.0), "0.0");
    }

    #[test]
    fn test_reference_scenario() {
        let sitemap = Sitemap::from_parts(
            BASE,
            &defaults::sitemap::pages(),
            PostPath::Blog,
            vec![post("a", 2024, 1, 1), PostRecord::draft("b")],
        )
        .unwrap();
        let xml = sitemap.into_xml(true);

        assert!(xml.contains("<loc>https://example.com</loc>"));
        assert!(xml.contains("<loc>https://example.com/blog</loc>"));
        assert!(xml.contains("<loc>https://example.com/blog/a</loc>"));
        assert!(xml.contains("<lastmod>2024-01-01T00:00:00.000Z</lastmod>"));
        assert!(!xml.contains("/blog/b"));
        assert_eq!(xml.matches("<url>").count(), 3);
    }

    #[test]
    fn test_exact_document() {
        let sitemap = Sitemap::from_parts(
            BASE,
            &[StaticPage::new("", ChangeFreq::Daily, 1.0)],
            PostPath::Blog,
            vec![post("a", 2024, 1, 1)],
        )
        .unwrap();

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com</loc>
    <changefreq>daily</changefreq>
    <priority>1.0</priority>
  </url>
  <url>
    <loc>https://example.com/blog/a</loc>
    <lastmod>2024-01-01T00:00:00.000Z</lastmod>
    <changefreq>monthly</changefreq>
    <priority>0.7</priority>
  </url>
</urlset>
"#;
        assert_eq!(sitemap.into_xml(true), expected);
    }

    #[test]
    fn test_compact_document() {
        let sitemap = Sitemap::from_parts(
            BASE,
            &[StaticPage::new("blog", ChangeFreq::Weekly, 0.5)],
            PostPath::Blog,
            vec![],
        )
        .unwrap();

        assert_eq!(
            sitemap.into_xml(false),
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "\n",
                r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
                "<url><loc>https://example.com/blog</loc><changefreq>weekly</changefreq>",
                "<priority>0.5</priority></url></urlset>\n",
            )
        );
    }

    #[test]
    fn test_nested_post_path() {
        let sitemap = Sitemap::from_parts(BASE, &[], PostPath::BlogPosts, vec![post("a", 2024, 1, 1)])
            .unwrap();
        assert_eq!(sitemap.urls()[0].loc, "https://example.com/blog/posts/a");
    }

    #[test]
    fn test_static_pages_precede_posts_in_order() {
        let pages = vec![
            StaticPage::new("", ChangeFreq::Daily, 1.0),
            StaticPage::new("about", ChangeFreq::Yearly, 0.3),
            StaticPage::new("blog", ChangeFreq::Daily, 0.8),
        ];
        let posts = vec![post("z", 2024, 3, 1), post("m", 2023, 1, 1), post("a", 2024, 1, 1)];
        let sitemap = Sitemap::from_parts(BASE, &pages, PostPath::Blog, posts).unwrap();

        let locs: Vec<_> = sitemap.urls().iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(
            locs,
            [
                "https://example.com",
                "https://example.com/about",
                "https://example.com/blog",
                "https://example.com/blog/z",
                "https://example.com/blog/m",
                "https://example.com/blog/a",
            ]
        );
    }

    #[test]
    fn test_every_published_post_listed_once() {
        let posts = vec![
            post("first", 2024, 1, 1),
            PostRecord::draft("hidden"),
            post("second", 2024, 5, 20),
            PostRecord::draft("also-hidden"),
        ];
        let xml = Sitemap::from_parts(BASE, &[], PostPath::Blog, posts)
            .unwrap()
            .into_xml(true);

        let locs = texts(&xml, "loc");
        let lastmods = texts(&xml, "lastmod");
        assert_eq!(locs, ["https://example.com/blog/first", "https://example.com/blog/second"]);
        assert_eq!(lastmods, ["2024-01-01T00:00:00.000Z", "2024-05-20T00:00:00.000Z"]);
        assert!(!xml.contains("hidden"));
    }

    #[test]
    fn test_draft_without_date_is_not_an_error() {
        let result = Sitemap::from_parts(BASE, &[], PostPath::Blog, vec![PostRecord::draft("wip")]);
        assert!(result.unwrap().urls().is_empty());
    }

    #[test]
    fn test_published_post_without_date_fails() {
        let posts = vec![PostRecord {
            id: "a".into(),
            published: None,
            draft: false,
        }];
        let err = Sitemap::from_parts(BASE, &[], PostPath::Blog, posts).unwrap_err();
        assert!(matches!(
            err,
            SitemapError::DataSource(DataSourceError::MissingDate(ref id)) if id == "a"
        ));
    }

    #[test]
    fn test_empty_base_url_fails() {
        let err = Sitemap::from_parts("", &defaults::sitemap::pages(), PostPath::Blog, vec![])
            .unwrap_err();
        assert!(matches!(err, SitemapError::Configuration(_)));
    }

    #[test]
    fn test_invalid_priority_fails() {
        let pages = [StaticPage::new("", ChangeFreq::Daily, 1.2)];
        let err = Sitemap::from_parts(BASE, &pages, PostPath::Blog, vec![]).unwrap_err();
        assert!(matches!(err, SitemapError::Configuration(_)));
    }

    #[test]
    fn test_trailing_slash_base_not_duplicated() {
        let sitemap = Sitemap::from_parts(
            "https://example.com/",
            &defaults::sitemap::pages(),
            PostPath::Blog,
            vec![],
        )
        .unwrap();
        let locs: Vec<_> = sitemap.urls().iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(locs, ["https://example.com", "https://example.com/blog"]);
    }

    #[test]
    fn test_sitemap_escapes_special_chars() {
        let pages = [StaticPage::new("search?q=a&b=c", ChangeFreq::Never, 0.1)];
        let xml = Sitemap::from_parts(BASE, &pages, PostPath::Blog, vec![])
            .unwrap()
            .into_xml(true);
        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b=c</loc>"));
    }

    #[test]
    fn test_output_is_well_formed() {
        let pages = [StaticPage::new("tags/<&>", ChangeFreq::Daily, 0.5)];
        let posts = vec![post("a", 2024, 1, 1), post("b", 2024, 2, 1)];
        for indent in [true, false] {
            let xml = Sitemap::from_parts(BASE, &pages, PostPath::Blog, posts.clone())
                .unwrap()
                .into_xml(indent);
            let (root, ns) = parse_root(&xml);
            assert_eq!(root, "urlset");
            assert_eq!(ns, SITEMAP_NS);
        }
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let xml = Sitemap::from_parts(BASE, &defaults::sitemap::pages(), PostPath::Blog, vec![])
            .unwrap()
            .into_xml(true);

        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(!xml.contains("<lastmod>"));
        assert_eq!(parse_root(&xml).0, "urlset");
    }

    #[test]
    fn test_sitemap_xml_structure() {
        let xml = Sitemap::from_parts(BASE, &defaults::sitemap::pages(), PostPath::Blog, vec![])
            .unwrap()
            .into_xml(true);

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(lines.last().unwrap().trim(), "</urlset>");
    }

    #[tokio::test]
    async fn test_build_sitemap_is_idempotent() {
        let source = MemorySource::new(vec![post("a", 2024, 1, 1), PostRecord::draft("b")]);
        let config = config();

        let first = build_sitemap(&config, &source).await.unwrap();
        let second = build_sitemap(&config, &source).await.unwrap();
        assert_eq!(first, second);
        assert!(first.contains("<loc>https://example.com/blog/a</loc>"));
    }

    #[tokio::test]
    async fn test_build_sitemap_rejects_missing_post_path() {
        let mut config = config();
        config.sitemap.post_path = None;

        let err = build_sitemap(&config, &MemorySource::default()).await.unwrap_err();
        assert!(matches!(err, SitemapError::Configuration(_)));
    }

    struct SlowSource;

    impl ContentSource for SlowSource {
        async fn list_posts(&self) -> Result<Vec<PostRecord>, DataSourceError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_a_data_source_error() {
        let result = fetch_posts(&SlowSource, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(DataSourceError::Timeout(_))));
    }

    #[test]
    fn test_write_sitemap_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.sitemap.output = dir.path().join("public/nested/sitemap.xml");

        write_sitemap(&config, "<urlset/>").unwrap();
        assert_eq!(fs::read_to_string(&config.sitemap.output).unwrap(), "<urlset/>");
    }
}
