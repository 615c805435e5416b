use super::*;

fn engine() -> DocumentEngine {
    DocumentEngine::new(EngineOptions::default()).expect("engine patterns compile")
}

fn styled(blocks: &[Block]) -> Vec<(StructuralTag, &str)> {
    blocks
        .iter()
        .map(|block| (block.style, block.text.as_str()))
        .collect()
}

#[test]
fn first_line_is_always_the_title() {
    let output = engine().process_lines(&["1. Definitions", "Ordinary text"]);
    assert_eq!(
        styled(&output.blocks),
        vec![
            (StructuralTag::Title, "1. Definitions"),
            (StructuralTag::Normal, "Ordinary text"),
        ]
    );
}

#[test]
fn only_first_numeric_marker_of_a_section_becomes_a_subsection() {
    let output = engine().process_lines(&[
        "Nepal Citizenship Act, 2063",
        "1. Definitions",
        "(1) In this Act",
        "(2) unless the context",
    ]);
    assert_eq!(
        styled(&output.blocks),
        vec![
            (StructuralTag::Title, "Nepal Citizenship Act, 2063"),
            (StructuralTag::Heading3, "Section 1: Definitions"),
            (StructuralTag::Heading4, "Subsection (1):"),
            (StructuralTag::Normal, "In this Act"),
            (StructuralTag::Normal, "(2) unless the context"),
        ]
    );
    assert_eq!(output.blocks[1].role, BlockRole::Section);
    assert_eq!(output.blocks[2].role, BlockRole::Subsection);
}

#[test]
fn embedded_subsection_is_split_from_section_line() {
    let output = engine().process_lines(&[
        "Title",
        "2. Commencement (1) This Act shall come (2) into force",
        "(3) Later provision",
    ]);
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Heading3, "Section 2: Commencement"),
            (StructuralTag::Heading4, "Subsection (1):"),
            (StructuralTag::Normal, "This Act shall come (2) into force"),
            (StructuralTag::Normal, "(3) Later provision"),
        ]
    );
}

#[test]
fn symbol_prefixed_section_keeps_its_symbol() {
    let output = engine().process_lines(&["Title", "♦ 5A. Inserted section (1) Body text"]);
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Heading3, "Section ♦5A: Inserted section"),
            (StructuralTag::Heading4, "Subsection (1):"),
            (StructuralTag::Normal, "Body text"),
        ]
    );
}

#[test]
fn numeric_marker_outside_a_section_stays_heading() {
    let output = engine().process_lines(&["Title", "Preamble:", "(1) Whereas it is expedient"]);
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Heading1, "Preamble:"),
            (StructuralTag::Heading4, "(1) Whereas it is expedient"),
        ]
    );
}

#[test]
fn heading4_blocks_are_indented_in_both_forms() {
    let output = engine().process_lines(&[
        "Title",
        "Preamble:",
        "(1) Whereas",
        "1. Defs",
        "(1) In this Act",
    ]);
    let headings = output
        .blocks
        .iter()
        .filter(|block| block.style == StructuralTag::Heading4)
        .map(|block| (block.text.as_str(), block.indent))
        .collect::<Vec<_>>();
    assert_eq!(headings, vec![("(1) Whereas", true), ("Subsection (1):", true)]);

    let body = output.blocks.last().expect("subsection body");
    assert_eq!(body.text, "In this Act");
    assert!(!body.indent);
}

#[test]
fn amendments_run_until_a_structural_heading() {
    let output = engine().process_lines(&[
        "Some Act",
        "Amendments:",
        "First amendment act, 2020.",
        "1. Second Amendment 2065.1.1",
        "Chapter 1",
    ]);
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Subtitle, "Amendments:"),
            (StructuralTag::Subtitle, "First amendment act, 2020."),
            (StructuralTag::Subtitle, "1. Second Amendment 2065.1.1"),
            (StructuralTag::Heading2, "Chapter 1:"),
        ]
    );
    assert_eq!(output.blocks[4].role, BlockRole::Chapter);
}

#[test]
fn amendments_end_on_other_subtitles() {
    let engine = engine();
    let mut session = engine.session();
    session.feed_page(&["Some Act", "Amendments:", "Finance Act, 2070"]);
    assert!(session.state().within_amendments);

    session.feed_page(&["Date of Publication 2063.1.1", "plain prose"]);
    assert!(!session.state().within_amendments);

    let output = session.finish();
    assert_eq!(
        styled(&output.blocks[3..]),
        vec![
            (StructuralTag::Subtitle, "Date of Publication 2063.1.1"),
            (StructuralTag::Normal, "plain prose"),
        ]
    );
}

#[test]
fn amendments_can_be_disabled() {
    let engine = DocumentEngine::new(EngineOptions {
        preserve_amendments: false,
        ..EngineOptions::default()
    })
    .expect("engine");
    let output = engine.process_lines(&["Some Act", "Amendments:", "First amendment act, 2020."]);
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Subtitle, "Amendments:"),
            (StructuralTag::Normal, "First amendment act, 2020."),
        ]
    );
}

#[test]
fn date_line_merges_into_preceding_date_subtitle() {
    let output = engine().process_lines(&[
        "Nepal Act 2020",
        "Date of Authentication: ",
        "2078.4.12",
        "Preamble:",
        "2078.4.13",
    ]);
    assert_eq!(
        styled(&output.blocks),
        vec![
            (StructuralTag::Title, "Nepal Act 2020"),
            (StructuralTag::Subtitle, "Date of Authentication:\n2078.4.12"),
            (StructuralTag::Heading1, "Preamble:"),
            (StructuralTag::Normal, "2078.4.13"),
        ]
    );
}

#[test]
fn date_merge_can_be_disabled() {
    let engine = DocumentEngine::new(EngineOptions {
        merge_dates: false,
        ..EngineOptions::default()
    })
    .expect("engine");
    let output = engine.process_lines(&["Act", "Date of Publication", "2078.4.12"]);
    assert_eq!(output.blocks.len(), 3);
    assert_eq!(output.blocks[2].style, StructuralTag::Normal);
}

#[test]
fn table_rows_become_a_grid_instead_of_blocks() {
    let output = engine().process_lines(&["Title", "A | B | C", "1 | 2 | 3", "after"]);
    assert_eq!(
        styled(&output.blocks),
        vec![
            (StructuralTag::Title, "Title"),
            (StructuralTag::Normal, "after"),
        ]
    );
    assert_eq!(
        output.tables,
        vec![TableGrid {
            rows: vec![
                vec!["A".to_string(), "B".to_string(), "C".to_string()],
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
            ],
            position: 1,
        }]
    );
    assert_eq!(output.tables[0].row_count(), 2);
    assert_eq!(output.tables[0].column_count(), 3);
}

#[test]
fn engine_exposes_its_configured_rule_set() {
    let engine = DocumentEngine::new(EngineOptions {
        symbol_list_policy: SymbolListPolicy::ListItem,
        ..EngineOptions::default()
    })
    .expect("engine");
    assert_eq!(engine.options().symbol_list_policy, SymbolListPolicy::ListItem);

    let Normalized::Line(line) = engine.normalizer().normalize("  ♦(3) inserted words ") else {
        panic!("expected a normalized line");
    };
    assert_eq!(engine.classifier().classify(&line.text), StructuralTag::Normal);
    assert_eq!(
        engine.classifier().matching_rule(&line.text).map(|rule| rule.name),
        Some("symbol_list_item")
    );
}

#[test]
fn single_table_row_is_reprocessed_as_text() {
    let output = engine().process_lines(&["Title", "A | B | C", "plain"]);
    assert!(output.tables.is_empty());
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Normal, "A | B | C"),
            (StructuralTag::Normal, "plain"),
        ]
    );
}

#[test]
fn page_numbers_urls_and_markers_never_produce_blocks() {
    let output = engine().process_lines(&[
        "Title",
        "12",
        "  7  ",
        "www.lawcommission.gov.np",
        "(Official Translation)",
        "text",
    ]);
    assert_eq!(
        styled(&output.blocks),
        vec![(StructuralTag::Title, "Title"), (StructuralTag::Normal, "text")]
    );
}

#[test]
fn schedule_prose_is_indented_and_keeps_spacing() {
    let output = engine().process_lines(&[
        "Title",
        "",
        "Schedule-1",
        "Form of application",
        "",
        "(Official Translation)",
        "Name of applicant",
        "Chapter 2 Miscellaneous",
        "",
        "after",
    ]);

    let expected = vec![
        (StructuralTag::Title, "Title", false),
        (StructuralTag::Heading5, "Schedule-1", false),
        (StructuralTag::Normal, "Form of application", true),
        (StructuralTag::Normal, "", true),
        (StructuralTag::Normal, "Name of applicant", true),
        (StructuralTag::Heading2, "Chapter 2: Miscellaneous", false),
        (StructuralTag::Normal, "after", false),
    ];
    let actual = output
        .blocks
        .iter()
        .map(|block| (block.style, block.text.as_str(), block.indent))
        .collect::<Vec<_>>();
    assert_eq!(actual, expected);
}

#[test]
fn lettered_subsection_demotes_numeric_markers() {
    let engine = engine();
    let mut session = engine.session();
    session.feed_page(&["Title", "3. Functions", "(a) to frame policies,"]);
    assert!(session.state().within_lettered_subsection);

    session.feed_page(&["(1) sub item", "(b) to monitor", "4. Next", "(1) First"]);
    assert!(!session.state().within_lettered_subsection);

    let output = session.finish();
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![
            (StructuralTag::Heading3, "Section 3: Functions"),
            (StructuralTag::Normal, "(a) to frame policies,"),
            (StructuralTag::Normal, "(1) sub item"),
            (StructuralTag::Normal, "(b) to monitor"),
            (StructuralTag::Heading3, "Section 4: Next"),
            (StructuralTag::Heading4, "Subsection (1):"),
            (StructuralTag::Normal, "First"),
        ]
    );
}

#[test]
fn symbol_marker_policy_controls_list_items() {
    let heading = engine().process_lines(&["Title", "♦(2) substituted text"]);
    assert_eq!(
        styled(&heading.blocks[1..]),
        vec![(StructuralTag::Heading3, "♦(2) substituted text")]
    );

    let legacy = DocumentEngine::new(EngineOptions {
        symbol_list_policy: SymbolListPolicy::ListItem,
        ..EngineOptions::default()
    })
    .expect("engine");
    let output = legacy.process_lines(&["Title", "♦(2) substituted text"]);
    assert_eq!(
        styled(&output.blocks[1..]),
        vec![(StructuralTag::Normal, "♦(2) substituted text")]
    );
}

#[test]
fn state_persists_across_pages() {
    let pages = vec![vec!["Title", "Schedule 1"], vec!["Item one"]];
    let output = engine().process(&pages);
    assert_eq!(output.total_pages, 2);
    assert_eq!(output.pages_with_text, 2);
    let last = output.blocks.last().expect("block");
    assert_eq!(last.text, "Item one");
    assert!(last.indent);
}

#[test]
fn state_tracks_last_block_by_index() {
    let engine = engine();
    let mut session = engine.session();
    assert!(session.state().is_first_line);
    session.feed_page(&["Title", "Preamble:"]);
    assert!(!session.state().is_first_line);
    assert_eq!(session.state().last_block, Some(1));
    assert_eq!(session.state().last_block_tag, Some(StructuralTag::Heading1));
    assert_eq!(session.blocks().len(), 2);
}

#[test]
fn blank_only_document_is_structurally_empty() {
    let output = engine().process(&[vec!["", "12", "   "], vec![]]);
    assert!(output.blocks.is_empty());
    assert_eq!(output.pages_with_text, 1);

    let document = assemble(output);
    assert!(document.is_structurally_empty());
}

#[test]
fn assembled_stats_match_block_stream() {
    let output = engine().process_lines(&[
        "Nepal Citizenship Act, 2063",
        "Preamble:",
        "Chapter-1 Preliminary",
        "1. Short title (1) This Act may be cited",
        "Fee | Amount | Remarks",
        "Passport | 5000 | new",
        "2. Definitions",
        "Schedule-1",
    ]);
    let document = assemble(output);
    let stats = &document.stats;
    assert_eq!(stats.headings.title, 1);
    assert_eq!(stats.headings.h1, 1);
    assert_eq!(stats.headings.h2, 1);
    assert_eq!(stats.headings.h3, 2);
    assert_eq!(stats.headings.h4, 1);
    assert_eq!(stats.headings.h5, 1);
    assert_eq!(stats.sections_found, 2);
    assert_eq!(stats.tables_found, 1);
    assert!(verify_integrity(&document).is_empty());
}
