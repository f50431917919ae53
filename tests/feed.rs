use std::fs;

use arxiv_ingest::feed::{FeedValue, parse_feed};

fn text<'a>(value: &'a FeedValue, key: &str) -> Option<&'a str> {
    value.get(key).and_then(FeedValue::as_text)
}

#[test]
fn parse_fixture_entries() {
    let body = fs::read_to_string("tests/fixtures/arxiv_page.xml").unwrap();
    let feed = parse_feed(&body).unwrap();

    assert_eq!(feed.total_results, Some(1208));
    assert_eq!(feed.entries.len(), 3);

    let first = &feed.entries[0];
    assert_eq!(text(first, "id"), Some("http://arxiv.org/abs/1512.08756v1"));
    assert_eq!(text(first, "updated"), Some("2015-12-29T19:01:37Z"));
    assert!(text(first, "title").unwrap().starts_with("Feed-Forward Networks"));
    assert_eq!(text(first, "author"), Some("Daniel P. W. Ellis"));
    assert_eq!(
        text(first, "arxiv_comment"),
        Some("Submitted to ICLR 2016 workshop")
    );
    assert_eq!(text(first, "link"), Some("http://arxiv.org/abs/1512.08756v1"));

    let Some(FeedValue::List(authors)) = first.get("authors") else {
        panic!("authors should be a list");
    };
    assert_eq!(authors.len(), 2);
    assert_eq!(text(&authors[0], "name"), Some("Colin Raffel"));
    assert_eq!(
        text(&authors[1], "arxiv_affiliation"),
        Some("Columbia University")
    );

    let Some(FeedValue::List(links)) = first.get("links") else {
        panic!("links should be a list");
    };
    assert_eq!(links.len(), 2);
    assert_eq!(text(&links[1], "title"), Some("pdf"));

    let Some(FeedValue::List(tags)) = first.get("tags") else {
        panic!("tags should be a list");
    };
    let terms: Vec<_> = tags.iter().filter_map(|tag| text(tag, "term")).collect();
    assert_eq!(terms, vec!["cs.LG", "cs.NE"]);

    let primary = first.get("arxiv_primary_category").unwrap();
    assert_eq!(text(primary, "term"), Some("cs.LG"));
}

#[test]
fn parse_unescapes_text() {
    let body = fs::read_to_string("tests/fixtures/arxiv_page.xml").unwrap();
    let feed = parse_feed(&body).unwrap();
    let third = &feed.entries[2];
    assert_eq!(
        text(third, "summary"),
        Some("A revised simplified model of attention & its applications.")
    );
    assert_eq!(text(third, "arxiv_journal_ref"), Some("ICLR 2016 Workshop"));
}

#[test]
fn self_closing_text_elements_are_empty_strings() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <entry>
    <id>http://arxiv.org/abs/1601.00001v1</id>
    <title>Untitled abstract</title>
    <summary/>
    <arxiv:comment/>
    <author><name>A. Author</name><arxiv:affiliation/></author>
    <link href="http://arxiv.org/abs/1601.00001v1" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;
    let feed = parse_feed(body).unwrap();
    let entry = &feed.entries[0];

    assert_eq!(text(entry, "summary"), Some(""));
    assert_eq!(text(entry, "arxiv_comment"), Some(""));
    assert_eq!(text(entry, "link"), Some("http://arxiv.org/abs/1601.00001v1"));
    let Some(FeedValue::List(authors)) = entry.get("authors") else {
        panic!("authors should be a list");
    };
    assert_eq!(text(&authors[0], "arxiv_affiliation"), Some(""));
}
