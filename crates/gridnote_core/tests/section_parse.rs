use gridnote_core::{
    generate_section_markdown, insert_missing_sections, parse, section_exists,
    validate_required_sections, TitleError,
};

#[test]
fn parse_splits_on_top_level_headings_only() {
    let text = "# A\nfoo\n## nested\n### deeper\n# B\nbar\n";
    let registry = parse(text);

    assert_eq!(registry.len(), 2);

    let a = registry.get("A").unwrap();
    assert_eq!(a.start, 0);
    assert_eq!(a.end, 4);
    assert_eq!(a.lines, vec!["foo", "## nested", "### deeper"]);

    let b = registry.get("B").unwrap();
    assert_eq!(b.start, 4);
    assert_eq!(b.end, 7);
    assert_eq!(b.lines, vec!["bar", ""]);
}

#[test]
fn malformed_headings_are_content() {
    let text = "# A\n#not a heading\n#\n# \n# #tag\ncontent\n";
    let registry = parse(text);

    assert_eq!(registry.len(), 1);
    let a = registry.get("A").unwrap();
    assert_eq!(a.end, 7);
    assert!(a.lines.contains(&"#not a heading".to_string()));
}

#[test]
fn document_without_headings_yields_empty_registry() {
    let registry = parse("just\nplain\ntext\n");

    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn empty_document_yields_empty_registry() {
    assert!(parse("").is_empty());
}

#[test]
fn crlf_line_endings_still_delimit() {
    let registry = parse("# A\r\nfoo\r\n# B\r\nbar\r\n");

    assert!(registry.contains("A"));
    assert!(registry.contains("B"));
    assert_eq!(registry.get("B").unwrap().start, 2);
}

#[test]
fn sections_are_ordered_and_non_overlapping() {
    let text = "intro\n# One\na\n# Two\nb\nc\n# Three\n# Four\nd\n";
    let registry = parse(text);
    let sections = registry.sections();

    assert_eq!(sections.len(), 4);
    for pair in sections.windows(2) {
        assert!(pair[0].start < pair[1].start);
        assert!(pair[0].end <= pair[1].start);
    }
}

#[test]
fn duplicate_titles_resolve_to_last_occurrence_and_are_reported() {
    let text = "# Log\nold\n# Other\nx\n# Log\nnew\n";
    let registry = parse(text);

    assert_eq!(registry.get("Log").unwrap().lines, vec!["new", ""]);
    assert_eq!(registry.duplicate_titles(), ["Log".to_string()]);
}

#[test]
fn generated_sections_round_trip_through_parse() {
    let content = "alpha\nbeta";
    let text = generate_section_markdown("Tasks", content).unwrap();

    let registry = parse(&text);
    assert_eq!(registry.len(), 1);
    let section = registry.get("Tasks").unwrap();
    assert_eq!(section.content().trim(), content);
}

#[test]
fn generate_normalizes_trailing_newlines() {
    let text = generate_section_markdown("Tasks", "alpha\n\n\n").unwrap();

    assert_eq!(text, "# Tasks\n\nalpha\n");
}

#[test]
fn generate_rejects_malformed_titles() {
    assert_eq!(
        generate_section_markdown("", "x"),
        Err(TitleError::Empty)
    );
    assert!(matches!(
        generate_section_markdown("a\nb", "x"),
        Err(TitleError::ContainsNewline(_))
    ));
    assert!(matches!(
        generate_section_markdown("item #2", "x"),
        Err(TitleError::ContainsHash(_))
    ));
}

#[test]
fn section_exists_matches_parse() {
    let text = "# A\nfoo\n";

    assert!(section_exists(text, "A"));
    assert!(!section_exists(text, "B"));
}

#[test]
fn insert_missing_sections_appends_only_absent_titles() {
    let text = "# A\nfoo\n";
    let updated =
        insert_missing_sections(text, &["A".to_string(), "B".to_string()]).unwrap();

    assert_eq!(updated, "# A\nfoo\n\n# B\n\n");
    let registry = parse(&updated);
    assert!(registry.contains("A"));
    assert!(registry.contains("B"));
    assert_eq!(registry.get("A").unwrap().lines[0], "foo");
}

#[test]
fn insert_missing_sections_is_idempotent_when_nothing_is_missing() {
    let text = "# A\nfoo\n# B\nbar\n";
    let updated =
        insert_missing_sections(text, &["A".to_string(), "B".to_string()]).unwrap();

    assert_eq!(updated, text);
}

#[test]
fn insert_missing_sections_separates_from_unterminated_content() {
    let updated = insert_missing_sections("# A\nfoo", &["B".to_string()]).unwrap();

    assert_eq!(updated, "# A\nfoo\n\n# B\n\n");
}

#[test]
fn insert_into_empty_document_needs_no_separator() {
    let updated = insert_missing_sections("", &["A".to_string()]).unwrap();

    assert_eq!(updated, "# A\n\n");
}

#[test]
fn validate_required_sections_reports_every_missing_title() {
    let text = "# A\nfoo\n";
    let required = vec!["A".to_string(), "B".to_string(), "C".to_string()];

    let err = validate_required_sections(text, &required).unwrap_err();
    assert_eq!(err.missing_titles, vec!["B", "C"]);

    let repaired = insert_missing_sections(text, &required).unwrap();
    let registry = validate_required_sections(&repaired, &required).unwrap();
    assert_eq!(registry.len(), 3);
}
