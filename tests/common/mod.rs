#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use arxiv_ingest::arxiv::{ArxivClient, PageRequest};
use arxiv_ingest::error::IngestError;
use arxiv_ingest::pacing::Sleeper;

pub struct Entry<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub summary: &'a str,
}

pub fn entry<'a>(url: &'a str, title: &'a str) -> Entry<'a> {
    Entry {
        url,
        title,
        summary: "",
    }
}

pub fn atom_page(entries: &[Entry<'_>]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n",
    );
    for entry in entries {
        body.push_str(&format!(
            "  <entry>\n    <id>{url}</id>\n    <updated>2016-01-04T17:20:18Z</updated>\n    <title>{title}</title>\n    <summary>{summary}</summary>\n    <author><name>A. Author</name></author>\n    <link href=\"{url}\" rel=\"alternate\" type=\"text/html\"/>\n  </entry>\n",
            url = entry.url,
            title = entry.title,
            summary = entry.summary,
        ));
    }
    body.push_str("</feed>\n");
    body
}

pub fn empty_page() -> String {
    atom_page(&[])
}

/// Serves canned pages keyed by start offset; unknown offsets get an empty feed.
#[derive(Default)]
pub struct FakeArxiv {
    pages: HashMap<usize, String>,
    pub requests: RefCell<Vec<PageRequest>>,
}

impl FakeArxiv {
    pub fn with_page(mut self, start: usize, body: String) -> Self {
        self.pages.insert(start, body);
        self
    }

    pub fn starts(&self) -> Vec<usize> {
        self.requests.borrow().iter().map(|req| req.start).collect()
    }
}

impl ArxivClient for FakeArxiv {
    fn fetch_page(&self, request: &PageRequest) -> Result<String, IngestError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self
            .pages
            .get(&request.start)
            .cloned()
            .unwrap_or_else(empty_page))
    }
}

pub struct FailingArxiv;

impl ArxivClient for FailingArxiv {
    fn fetch_page(&self, _request: &PageRequest) -> Result<String, IngestError> {
        Err(IngestError::ArxivHttp("connection refused".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
