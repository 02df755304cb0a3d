//! Sitemap XML parsing
//!
//! A fetched document is either a `<sitemapindex>` listing child sitemap
//! locations or a `<urlset>` listing page URLs. Both shapes are read with the
//! same event loop: the root element must match, and the text of each `<loc>`
//! directly under a root-level entry is collected in document order.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Root and entry element names for a sitemap index
const INDEX_ROOT: &str = "sitemapindex";
const INDEX_ENTRY: &str = "sitemap";

/// Root and entry element names for a leaf sitemap
const URLSET_ROOT: &str = "urlset";
const URLSET_ENTRY: &str = "url";

const LOC: &str = "loc";

/// Errors produced while reading a sitemap document
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("document has no root element")]
    NoRootElement,

    #[error("document ended before the root element was closed")]
    Truncated,
}

/// A classified sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Leaf sitemap: page URLs in document order
    UrlSet(Vec<String>),

    /// Sitemap index: child sitemap locations in document order
    Index(Vec<String>),
}

/// Classifies a fetched document as an index or a leaf URL set
///
/// The index interpretation wins only when it parses and names at least one
/// child; everything else is read as a URL set, whose parse error is returned.
pub fn classify_document(xml: &str) -> Result<SitemapDocument, XmlError> {
    match parse_index(xml) {
        Ok(children) if !children.is_empty() => Ok(SitemapDocument::Index(children)),
        _ => parse_urlset(xml).map(SitemapDocument::UrlSet),
    }
}

/// Parses a `<sitemapindex>` document into child sitemap locations
pub fn parse_index(xml: &str) -> Result<Vec<String>, XmlError> {
    collect_locs(xml, INDEX_ROOT, INDEX_ENTRY)
}

/// Parses a `<urlset>` document into page URLs
pub fn parse_urlset(xml: &str) -> Result<Vec<String>, XmlError> {
    collect_locs(xml, URLSET_ROOT, URLSET_ENTRY)
}

/// Collects `<root><entry><loc>..</loc></entry></root>` values
///
/// Element names are compared by local name so namespace prefixes are ignored.
fn collect_locs(xml: &str, root: &'static str, entry: &str) -> Result<Vec<String>, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(e.local_name().as_ref());
                match depth {
                    0 => {
                        check_root(&name, root)?;
                        seen_root = true;
                    }
                    1 if name == entry => in_entry = true,
                    2 if in_entry && name == LOC => {
                        in_loc = true;
                        current.clear();
                    }
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    // Self-closing root, e.g. `<urlset/>`
                    check_root(&local_name(e.local_name().as_ref()), root)?;
                    seen_root = true;
                }
            }
            Ok(Event::Text(e)) => {
                if in_loc {
                    let text = e
                        .unescape()
                        .map_err(|err| XmlError::Malformed(err.to_string()))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_loc {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 if in_loc => {
                        in_loc = false;
                        let loc = current.trim();
                        if !loc.is_empty() {
                            locs.push(loc.to_string());
                        }
                    }
                    1 if in_entry => in_entry = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlError::Malformed(e.to_string())),
            _ => {}
        }
    }

    if !seen_root {
        return Err(XmlError::NoRootElement);
    }
    if depth != 0 {
        return Err(XmlError::Truncated);
    }

    Ok(locs)
}

fn check_root(found: &str, expected: &'static str) -> Result<(), XmlError> {
    if found == expected {
        Ok(())
    } else {
        Err(XmlError::UnexpectedRoot {
            expected,
            found: found.to_string(),
        })
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_string()
}
