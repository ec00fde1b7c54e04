use xmlpretty::{AttributeRules, Document};

const SRC: &str = include_str!("books.xml");
const CMP: &str = include_str!("books.formatted.xml");

#[test]
fn test_format_catalog() {
    let document = match Document::parse(SRC) {
        Ok(doc) => doc,
        Err(e) => panic!("{e}"),
    };

    let str = document.to_xml(3).unwrap();
    if str != CMP {
        let mut src_lines = str.lines();
        for (i, line) in CMP.lines().enumerate() {
            match src_lines.next() {
                None => {
                    panic!(
                        "Diff at line {}: Not enough rows in formatted document!",
                        i + 1
                    );
                }

                Some(l) => {
                    if line == l {
                        continue;
                    } else {
                        eprintln!("Diff at line {}", i + 1);

                        eprintln!("Expected: {line}");
                        eprintln!("Got: {l}");
                        break;
                    }
                }
            }
        }

        panic!("Formatted document does not match expected output");
    }
}

#[test]
fn test_round_trip_preserves_tree() {
    let document = match Document::parse(SRC) {
        Ok(doc) => doc,
        Err(e) => panic!("{e}"),
    };

    let formatted = document.to_xml(3).unwrap();
    let reparsed = Document::parse(&formatted).expect("Could not reparse formatted output");

    assert_eq!(document, reparsed);

    // Formatting the already-formatted document changes nothing
    assert_eq!(reparsed.to_xml(3).unwrap(), formatted);
}

#[test]
fn test_sorting_is_idempotent_through_the_formatter() {
    let rules = AttributeRules::new(true, Vec::<String>::new());

    let mut document = Document::parse(SRC).unwrap();
    rules.apply(&mut document.root);
    let once = document.to_xml(3).unwrap();

    let mut reparsed = Document::parse(&once).unwrap();
    rules.apply(&mut reparsed.root);
    assert_eq!(reparsed.to_xml(3).unwrap(), once);
}

#[test]
fn test_filtering_preserves_remaining_order() {
    let rules = AttributeRules::new(false, ["genre".to_string()]);

    let mut document = Document::parse(SRC).unwrap();
    rules.apply(&mut document.root);
    let formatted = document.to_xml(3).unwrap();

    assert!(formatted.contains(r#"<book id="bk101" price="44.95">"#));
    assert!(formatted.contains(r#"<book price="5.95" id="bk102">"#));
}

#[test]
fn test_sort_and_filter_example() {
    let mut document = Document::parse(r#"<a z="1" b="2" secret="x"/>"#).unwrap();
    AttributeRules::new(true, ["secret".to_string()]).apply(&mut document.root);

    assert_eq!(document.to_xml(3).unwrap(), "<a b=\"2\" z=\"1\" />\n");
}

#[test]
fn test_indent_width_is_exact() {
    let document = Document::parse("<a><b><c/></b></a>").unwrap();

    for indent in [0, 1, 2, 3, 4, 8] {
        let formatted = document.to_xml(indent).unwrap();
        let expected = format!(
            "<a>\n{pad}<b>\n{pad}{pad}<c />\n{pad}</b>\n</a>\n",
            pad = " ".repeat(indent)
        );
        assert_eq!(formatted, expected, "indent width {indent}");
    }
}
