use crate::response_parser::{parse_answer, parse_code_sections, parse_file_search};

use models::LineRange;

fn file_search_block(path: &str, reason: &str) -> String {
    format!("*FILE_SEARCH*\npath: {path}\nreason: {reason}\n*END_FILE_SEARCH*")
}

// ============================================
// FILE_SEARCH
// ============================================

/// **VALUE**: N well-formed blocks yield exactly N results in document order.
///
/// **WHY THIS MATTERS**: Discovery order becomes analysis order and therefore
/// the order of files in the answer tree.
///
/// **BUG THIS CATCHES**: A scanner that resumes from the wrong offset would
/// skip or duplicate blocks.
#[test]
fn given_three_blocks_with_prose_between_when_parsing_file_search_then_returns_all_in_order() {
    // GIVEN: three blocks separated by chatter
    let text = format!(
        "Here are the files:\n{}\nAlso:\n{}\n\n{}\nDone.",
        file_search_block("src/a.rs", "entry point"),
        file_search_block("src/b.rs", "parser"),
        file_search_block("src/c.rs", "config"),
    );

    // WHEN
    let results = parse_file_search(&text);

    // THEN
    let paths: Vec<&str> = results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["src/a.rs", "src/b.rs", "src/c.rs"]);
    assert_eq!(results[1].reason, "parser");
}

/// **VALUE**: A block missing `reason` is dropped without losing its neighbours.
///
/// **BUG THIS CATCHES**: Treating one malformed block as a parse failure of
/// the whole response.
#[test]
fn given_block_missing_reason_when_parsing_file_search_then_other_blocks_survive() {
    // GIVEN
    let text = format!(
        "{}\n*FILE_SEARCH*\npath: src/orphan.rs\n*END_FILE_SEARCH*\n{}",
        file_search_block("src/a.rs", "first"),
        file_search_block("src/b.rs", "second"),
    );

    // WHEN
    let results = parse_file_search(&text);

    // THEN
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.path != "src/orphan.rs"));
}

#[test]
fn given_no_blocks_when_parsing_file_search_then_returns_empty() {
    assert!(parse_file_search("I could not find anything relevant.").is_empty());
    assert!(parse_file_search("").is_empty());
}

#[test]
fn given_unterminated_final_block_when_parsing_file_search_then_it_is_dropped() {
    // GIVEN: output cut off mid-block
    let text = format!(
        "{}\n*FILE_SEARCH*\npath: src/cut.rs\nreason: trunc",
        file_search_block("src/a.rs", "kept")
    );

    // WHEN
    let results = parse_file_search(&text);

    // THEN
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "src/a.rs");
}

/// **VALUE**: An opening tag that never closes does not swallow the next block.
///
/// **BUG THIS CATCHES**: A lazy open-to-close match would merge both blocks
/// and report the first block's path with the second block's reason.
#[test]
fn given_block_reopened_before_close_when_parsing_file_search_then_only_later_block_is_used() {
    // GIVEN
    let text = "*FILE_SEARCH*\npath: src/lost.rs\n*FILE_SEARCH*\npath: src/real.rs\nreason: complete\n*END_FILE_SEARCH*";

    // WHEN
    let results = parse_file_search(text);

    // THEN
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "src/real.rs");
    assert_eq!(results[0].reason, "complete");
}

#[test]
fn given_uppercase_keys_and_list_markers_when_parsing_file_search_then_fields_are_read() {
    let text = "*FILE_SEARCH*\n- PATH:   src/lib.rs  \n- Reason: crate root\n*END_FILE_SEARCH*";

    let results = parse_file_search(text);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "src/lib.rs");
    assert_eq!(results[0].reason, "crate root");
}

#[test]
fn given_key_that_only_ends_with_field_name_when_parsing_file_search_then_block_is_dropped() {
    let text = "*FILE_SEARCH*\nfilepath: src/lib.rs\nreason: wrong key\n*END_FILE_SEARCH*";

    assert!(parse_file_search(text).is_empty());
}

#[test]
fn given_empty_field_value_when_parsing_file_search_then_block_is_dropped() {
    let text = "*FILE_SEARCH*\npath: src/lib.rs\nreason:\n*END_FILE_SEARCH*";

    assert!(parse_file_search(text).is_empty());
}

// ============================================
// CODE_SECTION
// ============================================

#[test]
fn given_well_formed_section_when_parsing_code_sections_then_fields_are_extracted() {
    // GIVEN
    let text = "*CODE_SECTION*\nlines: 10-20\ncode: fn parse(input: &str) {}\nexplanation: parses input\n*END_CODE_SECTION*";

    // WHEN
    let sections = parse_code_sections(text);

    // THEN
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].line_range, LineRange::new(10, 20));
    assert_eq!(sections[0].code, "fn parse(input: &str) {}");
    assert_eq!(sections[0].explanation, "parses input");
}

/// **VALUE**: A `code:` field with an empty inline value collects the lines
/// that follow it.
///
/// **WHY THIS MATTERS**: Models routinely put code on the lines after the key.
///
/// **BUG THIS CATCHES**: Reading only the key line would drop every
/// multi-line section as "missing code".
#[test]
fn given_multiline_code_when_parsing_code_sections_then_body_is_kept_verbatim() {
    // GIVEN
    let text = "*CODE_SECTION*\nlines: 3-5\ncode:\nfn main() {\n    run();\n}\nexplanation: entry point\n*END_CODE_SECTION*";

    // WHEN
    let sections = parse_code_sections(text);

    // THEN
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].code, "fn main() {\n    run();\n}");
    assert_eq!(sections[0].explanation, "entry point");
}

/// **VALUE**: Field-like lines inside a code body stay part of the code.
///
/// **BUG THIS CATCHES**: Would catch an indented `explanation: String,` ending
/// the code value early and being taken as the section's explanation.
#[test]
fn given_code_with_field_like_lines_when_parsing_code_sections_then_body_is_intact() {
    // GIVEN: a struct whose fields share names with block keys
    let text = "*CODE_SECTION*\nlines: 5-9\ncode:\npub struct CodeSection {\n    code: String,\n    explanation: String,\n}\nexplanation: the struct definition\n*END_CODE_SECTION*";

    // WHEN
    let sections = parse_code_sections(text);

    // THEN
    assert_eq!(sections.len(), 1);
    assert_eq!(
        sections[0].code,
        "pub struct CodeSection {\n    code: String,\n    explanation: String,\n}"
    );
    assert_eq!(sections[0].explanation, "the struct definition");
}

#[test]
fn given_indented_field_outside_multiline_value_when_parsing_then_it_is_still_a_field() {
    let text = "*FILE_SEARCH*\n  path: src/lib.rs\n  reason: exports\n*END_FILE_SEARCH*";

    let results = parse_file_search(text);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "src/lib.rs");
    assert_eq!(results[0].reason, "exports");
}

#[test]
fn given_section_missing_explanation_when_parsing_code_sections_then_it_is_dropped() {
    let text = "*CODE_SECTION*\nlines: 1-2\ncode: x\n*END_CODE_SECTION*\n*CODE_SECTION*\nlines: 4\ncode: y\nexplanation: kept\n*END_CODE_SECTION*";

    let sections = parse_code_sections(text);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].line_range, LineRange::single(4));
}

#[test]
fn given_unparseable_line_range_when_parsing_code_sections_then_block_is_dropped() {
    let text = "*CODE_SECTION*\nlines: somewhere near the top\ncode: x\nexplanation: vague\n*END_CODE_SECTION*";

    assert!(parse_code_sections(text).is_empty());
}

#[test]
fn given_inverted_line_range_when_parsing_code_sections_then_range_is_normalized() {
    let text = "*CODE_SECTION*\nlines: 20-10\ncode: x\nexplanation: backwards\n*END_CODE_SECTION*";

    let sections = parse_code_sections(text);

    assert_eq!(sections[0].line_range, LineRange::new(10, 20));
    assert_eq!(sections[0].line_range.to_string(), "10-20");
}

// ============================================
// ANSWER
// ============================================

#[test]
fn given_no_answer_block_when_parsing_answer_then_returns_none() {
    assert_eq!(parse_answer("The answer is 42."), None);
}

/// **VALUE**: Only the first ANSWER block is read.
///
/// **BUG THIS CATCHES**: A global scan that lets a later block overwrite the
/// first, or that concatenates both.
#[test]
fn given_two_answer_blocks_when_parsing_answer_then_first_is_used() {
    // GIVEN
    let text = "*ANSWER*\nsummary: first\ndetails: one\n*END_ANSWER*\n*ANSWER*\nsummary: second\ndetails: two\n*END_ANSWER*";

    // WHEN
    let answer = parse_answer(text);

    // THEN
    let answer = answer.expect("first block is complete");
    assert_eq!(answer.summary, "first");
    assert_eq!(answer.details, "one");
}

#[test]
fn given_incomplete_first_answer_when_parsing_answer_then_later_block_is_ignored() {
    let text = "*ANSWER*\nsummary: only summary\n*END_ANSWER*\n*ANSWER*\nsummary: s\ndetails: d\n*END_ANSWER*";

    assert_eq!(parse_answer(text), None);
}

#[test]
fn given_references_list_when_parsing_answer_then_items_are_split_and_trimmed() {
    // GIVEN: a blank item between commas
    let text = "*ANSWER*\nsummary: s\ndetails: d\nreferences: src/a.rs,  src/b.rs , ,src/c.rs\n*END_ANSWER*";

    // WHEN
    let answer = parse_answer(text).expect("answer present");

    // THEN
    assert_eq!(answer.references, vec!["src/a.rs", "src/b.rs", "src/c.rs"]);
}

#[test]
fn given_answer_without_references_when_parsing_answer_then_references_are_empty() {
    let answer = parse_answer("*ANSWER*\nSummary: s\nDETAILS: d\n*END_ANSWER*").expect("answer present");

    assert!(answer.references.is_empty());
}

#[test]
fn given_truncated_answer_when_parsing_answer_then_returns_none() {
    assert_eq!(parse_answer("*ANSWER*\nsummary: s\ndetails: d"), None);
}
