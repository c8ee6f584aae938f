//! EPUB books read end to end.
//!
//! A small two-chapter book is zipped into a temp dir and read back through
//! `input::read_book`, checking that:
//! - both spine items are read, the first one included
//! - chapters keep spine order and words from adjacent blocks stay apart
//! - escaped characters come back as plain text and styles are dropped

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use lemma_count_lib::input::read_book;
use lemma_count_lib::tokenizer::words;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const PACKAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Two Chapters</dc:title>
    <dc:identifier id="bookid">lemma-count-test</dc:identifier>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

const CHAPTER_ONE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><style>p { color: red; }</style></head>
<body><h1>Opening</h1><p>The cats ran quickly.</p></body>
</html>"#;

const CHAPTER_TWO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<body><p>Salt &amp; pepper</p><p>closing</p></body>
</html>"#;

fn build_epub(dir: &Path) -> PathBuf {
    let path = dir.join("two_chapters.epub");
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    // The mimetype entry has to come first and stay uncompressed
    for (name, body) in [
        ("mimetype", "application/epub+zip"),
        ("META-INF/container.xml", CONTAINER),
        ("OEBPS/content.opf", PACKAGE),
        ("OEBPS/ch1.xhtml", CHAPTER_ONE),
        ("OEBPS/ch2.xhtml", CHAPTER_TWO),
    ] {
        zip.start_file(name, stored).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

#[test]
fn test_epub_reads_every_chapter_in_spine_order() {
    let dir = tempfile::tempdir().unwrap();
    let book = build_epub(dir.path());

    let text = read_book(&book).unwrap();
    let found: Vec<&str> = words(&text).collect();

    assert_eq!(
        found,
        vec!["Opening", "The", "cats", "ran", "quickly", "Salt", "pepper", "closing"]
    );
    assert!(text.contains("Salt & pepper"));
    assert!(!text.contains("color"));
}

#[test]
fn test_epub_chapters_are_separated() {
    let dir = tempfile::tempdir().unwrap();
    let book = build_epub(dir.path());

    let text = read_book(&book).unwrap();
    let chapters: Vec<&str> = text.split("\n\n").collect();

    assert_eq!(chapters.len(), 2);
    assert!(chapters[0].contains("cats ran quickly"));
    assert_eq!(chapters[1], "Salt & pepper closing");
}
