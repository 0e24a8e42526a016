use sha2::{Digest, Sha256};
use statement_pdf::fonts;
use statement_pdf::model::{ColumnSpec, MetaEntry, ReportDefinition, StatementRow};
use statement_pdf::pdf::{RenderedStatement, StatementRenderer, StatementStyle};

fn try_render(definition: &ReportDefinition, rows: &[StatementRow]) -> Option<RenderedStatement> {
    if !fonts::fonts_available() {
        return None;
    }
    Some(
        StatementRenderer::new(StatementStyle::new())
            .render(definition, rows)
            .expect("render statement"),
    )
}

fn skip(test: &str) {
    eprintln!(
        "Skipping {test}: statement fonts missing. Set STATEMENT_PDF_FONTS_DIR or copy the \
         Roboto faces into assets/fonts."
    );
}

fn sample_definition() -> ReportDefinition {
    ReportDefinition {
        title: Some("Account Statement".into()),
        header: vec![
            ColumnSpec::new("Date", "date"),
            ColumnSpec::new("Branch", "branch"),
            ColumnSpec::new("Start Balance", "startBalance"),
            ColumnSpec::new("Debit", "debit"),
            ColumnSpec::new("Credit", "credit"),
            ColumnSpec::new("End Balance", "endBalance"),
            ColumnSpec::new("Description", "description"),
            ColumnSpec::new("Target Account", "targetAccount"),
        ],
        meta: Some(vec![
            MetaEntry::new("Account Name", "J. Doe"),
            MetaEntry::new("Account Number", "5001122334"),
        ]),
        ..ReportDefinition::default()
    }
}

fn sample_row(date: &str) -> StatementRow {
    StatementRow {
        date: date.into(),
        branch: "505".into(),
        start_balance: "1000.00".into(),
        debit: "250.00".into(),
        credit: "0.00".into(),
        end_balance: "750.00".into(),
        description: "utility payment".into(),
        target_account: "5001122334".into(),
        ..StatementRow::default()
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes)
        .expect("parse rendered PDF")
        .get_pages()
        .len()
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let rows = [sample_row("2024-05-01"), sample_row("2024-05-02")];
    let Some(rendered) = try_render(&sample_definition(), &rows) else {
        skip("renders_non_empty_output");
        return;
    };
    assert!(rendered.bytes.starts_with(b"%PDF-"));
    assert!(
        rendered.warning.is_none(),
        "clean input should not degrade: {:?}",
        rendered.warning
    );
    assert_eq!(page_count(&rendered.bytes), 1);
}

#[test]
fn rendering_is_deterministic() {
    let definition = sample_definition();
    let rows = [sample_row("2024-05-01")];
    let Some(first) = try_render(&definition, &rows) else {
        skip("rendering_is_deterministic");
        return;
    };
    let Some(second) = try_render(&definition, &rows) else {
        skip("rendering_is_deterministic");
        return;
    };

    assert_eq!(
        first.bytes.len(),
        second.bytes.len(),
        "PDF sizes should match"
    );
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "renders must be identical after metadata normalization"
    );
}

#[test]
fn title_lands_in_document_metadata() {
    let Some(rendered) = try_render(&sample_definition(), &[]) else {
        skip("title_lands_in_document_metadata");
        return;
    };
    assert!(
        contains_bytes(&rendered.bytes, b"Account Statement"),
        "document metadata should carry the report title"
    );
}

#[test]
fn empty_rows_still_render_the_header_row() {
    let definition = sample_definition();
    let Some(with_header) = try_render(&definition, &[]) else {
        skip("empty_rows_still_render_the_header_row");
        return;
    };
    assert!(with_header.warning.is_none());
    assert_eq!(page_count(&with_header.bytes), 1);

    let mut no_table = definition.clone();
    no_table.header.clear();
    let Some(without_table) = try_render(&no_table, &[]) else {
        skip("empty_rows_still_render_the_header_row");
        return;
    };
    assert!(without_table.warning.is_none());
    assert_ne!(
        normalized_hash(&with_header.bytes),
        normalized_hash(&without_table.bytes),
        "the header row must be drawn even when there are no data rows"
    );
}

#[test]
fn all_empty_fields_row_still_adds_bordered_cells() {
    let definition = sample_definition();
    let Some(with_row) = try_render(&definition, &[StatementRow::default()]) else {
        skip("all_empty_fields_row_still_adds_bordered_cells");
        return;
    };
    assert!(with_row.warning.is_none());

    let Some(without_rows) = try_render(&definition, &[]) else {
        skip("all_empty_fields_row_still_adds_bordered_cells");
        return;
    };
    assert_ne!(
        normalized_hash(&with_row.bytes),
        normalized_hash(&without_rows.bytes),
        "an all-empty row must still occupy a bordered table row"
    );
}

#[test]
fn odd_meta_count_renders_with_padding() {
    let mut definition = sample_definition();
    definition.meta = Some(vec![
        MetaEntry::new("Account Name", "J. Doe"),
        MetaEntry::new("Account Number", "5001122334"),
        MetaEntry::new("Currency", "MNT"),
    ]);
    let Some(rendered) = try_render(&definition, &[sample_row("2024-05-01")]) else {
        skip("odd_meta_count_renders_with_padding");
        return;
    };
    assert!(
        rendered.warning.is_none(),
        "an odd metadata count must pad the final row, not fail: {:?}",
        rendered.warning
    );
    assert_eq!(page_count(&rendered.bytes), 1);
}

#[test]
fn column_count_mismatch_degrades_to_partial_document() {
    let mut definition = sample_definition();
    definition.header.truncate(3);
    let Some(rendered) = try_render(&definition, &[sample_row("2024-05-01")]) else {
        skip("column_count_mismatch_degrades_to_partial_document");
        return;
    };
    assert!(
        rendered.warning.is_some(),
        "a three-column definition cannot fill the eight-column table"
    );
    // The document is still finalized and keeps the bands composed before
    // the failure.
    assert!(rendered.bytes.starts_with(b"%PDF-"));
    assert_eq!(page_count(&rendered.bytes), 1);
    assert!(contains_bytes(&rendered.bytes, b"Account Statement"));
}

#[test]
fn unreadable_icon_falls_back_to_placeholder() {
    let mut definition = sample_definition();
    definition.icon = Some("no/such/logo.png".into());
    let Some(rendered) = try_render(&definition, &[sample_row("2024-05-01")]) else {
        skip("unreadable_icon_falls_back_to_placeholder");
        return;
    };
    assert!(
        rendered.warning.is_none(),
        "a bad icon path is replaced by the placeholder: {:?}",
        rendered.warning
    );
    assert!(rendered.bytes.starts_with(b"%PDF-"));
}

#[test]
fn printed_date_in_meta_renders_without_failure() {
    let mut definition = sample_definition();
    definition.meta = Some(vec![
        MetaEntry::new("Account Name", "J. Doe"),
        MetaEntry::new("Printed Date", "2024-01-31"),
    ]);
    let Some(rendered) = try_render(&definition, &[sample_row("2024-05-01")]) else {
        skip("printed_date_in_meta_renders_without_failure");
        return;
    };
    assert!(rendered.warning.is_none());
    assert_eq!(page_count(&rendered.bytes), 1);
}

#[test]
fn long_statements_flow_onto_more_pages() {
    let definition = sample_definition();
    let rows: Vec<StatementRow> = (1..=80)
        .map(|day| sample_row(&format!("2024-05-{:02}", day % 28 + 1)))
        .collect();
    let Some(rendered) = try_render(&definition, &rows) else {
        skip("long_statements_flow_onto_more_pages");
        return;
    };
    assert!(rendered.warning.is_none());
    assert!(
        page_count(&rendered.bytes) >= 2,
        "eighty rows exceed one A4 page"
    );
}
