use crate::config::{PromptTemplates, fill_template};

#[test]
fn given_repeated_placeholder_when_filling_template_then_only_first_is_replaced() {
    // GIVEN
    let template = "Q: ${question} / again: ${question}";

    // WHEN
    let filled = fill_template(template, &[("question", "why?")]);

    // THEN
    assert_eq!(filled, "Q: why? / again: ${question}");
}

#[test]
fn given_unknown_placeholder_when_filling_template_then_it_is_left_untouched() {
    let filled = fill_template("${question} ${other}", &[("question", "q")]);

    assert_eq!(filled, "q ${other}");
}

#[test]
fn given_value_containing_dollar_signs_when_filling_template_then_value_is_inserted_literally() {
    let filled = fill_template("File: ${fileContent}", &[("fileContent", "let $x = 1;")]);

    assert_eq!(filled, "File: let $x = 1;");
}

/// **VALUE**: The bundled templates parse and carry every placeholder the
/// pipeline substitutes.
///
/// **BUG THIS CATCHES**: A renamed placeholder in prompts.toml would silently
/// send the literal `${...}` text to the model.
#[test]
fn given_bundled_prompts_when_loaded_then_each_stage_has_its_placeholders() {
    // WHEN
    let prompts = PromptTemplates::bundled().expect("bundled prompts parse");

    // THEN
    assert!(prompts.file_discovery.template.contains("${question}"));
    for placeholder in ["${question}", "${filePath}", "${fileContent}"] {
        assert!(prompts.code_analysis.template.contains(placeholder), "{placeholder}");
    }
    assert!(prompts.final_answer.template.contains("${codeResults}"));
    assert!(prompts.final_answer.template.contains("*ANSWER*"));
}
