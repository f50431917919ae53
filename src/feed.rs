//! Atom feed reader for arXiv query responses.
//!
//! Entries come back as opaque [`FeedValue`] trees keyed the way feedparser
//! keys them (`authors`, `links`, `tags`, `arxiv_primary_category`, ...), so
//! downstream code never depends on the XML layout.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::IngestError;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedValue {
    Map(Vec<(String, FeedValue)>),
    List(Vec<FeedValue>),
    Text(String),
}

impl FeedValue {
    pub fn get(&self, key: &str) -> Option<&FeedValue> {
        match self {
            FeedValue::Map(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeedValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub total_results: Option<u64>,
    pub entries: Vec<FeedValue>,
}

#[derive(Debug, Default)]
struct MapBuilder {
    entries: Vec<(String, FeedValue)>,
}

impl MapBuilder {
    fn set(&mut self, key: String, value: FeedValue) {
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    fn push(&mut self, key: &str, value: FeedValue) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, FeedValue::List(items))) => items.push(value),
            Some((_, slot)) => *slot = FeedValue::List(vec![value]),
            None => self
                .entries
                .push((key.to_string(), FeedValue::List(vec![value]))),
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .and_then(|(_, value)| value.as_text())
    }

    fn finish(self) -> FeedValue {
        FeedValue::Map(self.entries)
    }
}

pub fn parse_feed(body: &str) -> Result<Feed, IngestError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut feed = Feed::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut entry: Option<MapBuilder> = None;
    let mut entry_depth = 0usize;
    let mut author: Option<MapBuilder> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            IngestError::FeedParse(format!("{err} at byte {}", reader.buffer_position()))
        })?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                let name = qualified_name(&e);
                if local(&name) == "entry" && entry.is_none() {
                    entry = Some(MapBuilder::default());
                    entry_depth = path.len() + 1;
                } else if let Some(current) = entry.as_mut() {
                    if local(&name) == "author" {
                        author = Some(MapBuilder::default());
                    } else {
                        attribute_element(current, &name, &e)?;
                    }
                }
                path.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                if let Some(current) = entry.as_mut() {
                    let name = qualified_name(&e);
                    if is_attribute_element(&name) {
                        attribute_element(current, &name, &e)?;
                    } else if let Some(current_author) = author.as_mut() {
                        current_author.set(feed_key(&name), text_value(""));
                    } else if path.len() == entry_depth {
                        current.set(feed_key(&name), text_value(""));
                    }
                }
            }
            Event::Text(t) => {
                let value = t
                    .unescape()
                    .map_err(|err| IngestError::FeedParse(err.to_string()))?;
                text.push_str(&value);
            }
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::End(_) => {
                let name = path.pop().unwrap_or_default();
                let value = std::mem::take(&mut text);
                let value = value.trim();
                if entry.is_some() && path.len() + 1 == entry_depth && local(&name) == "entry" {
                    if let Some(done) = entry.take() {
                        feed.entries.push(done.finish());
                    }
                } else if let Some(current) = entry.as_mut() {
                    if local(&name) == "author" {
                        if let Some(done) = author.take() {
                            if let Some(author_name) = done.text("name") {
                                current.set("author".to_string(), text_value(author_name));
                            }
                            current.push("authors", done.finish());
                        }
                    } else if let Some(current_author) = author.as_mut() {
                        current_author.set(feed_key(&name), text_value(value));
                    } else if path.len() == entry_depth && !is_attribute_element(&name) {
                        current.set(feed_key(&name), text_value(value));
                    }
                } else if local(&name) == "totalResults" {
                    feed.total_results = value.parse().ok();
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(feed)
}

fn attribute_element(
    entry: &mut MapBuilder,
    name: &str,
    element: &BytesStart<'_>,
) -> Result<(), IngestError> {
    match name {
        "link" => {
            let attrs = attributes(element)?;
            let rel = attrs.text("rel").unwrap_or("alternate").to_string();
            if rel == "alternate" {
                if let Some(href) = attrs.text("href") {
                    entry.set("link".to_string(), text_value(href));
                }
            }
            entry.push("links", attrs.finish());
        }
        "category" => {
            let attrs = attributes(element)?;
            entry.push("tags", attrs.finish());
        }
        "arxiv:primary_category" => {
            let attrs = attributes(element)?;
            entry.set("arxiv_primary_category".to_string(), attrs.finish());
        }
        _ => {}
    }
    Ok(())
}

fn attributes(element: &BytesStart<'_>) -> Result<MapBuilder, IngestError> {
    let mut map = MapBuilder::default();
    for attr in element.attributes() {
        let attr = attr.map_err(|err| IngestError::FeedParse(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|err| IngestError::FeedParse(err.to_string()))?;
        map.set(feed_key(&key), text_value(&value));
    }
    Ok(map)
}

fn is_attribute_element(name: &str) -> bool {
    matches!(name, "link" | "category" | "arxiv:primary_category")
}

fn qualified_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).to_string()
}

fn local(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn feed_key(name: &str) -> String {
    name.replace(':', "_")
}

fn text_value(value: &str) -> FeedValue {
    FeedValue::Text(value.to_string())
}
