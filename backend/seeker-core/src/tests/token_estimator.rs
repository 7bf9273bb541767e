use crate::token_estimator::{DEFAULT_CODE_EXTENSIONS, TokenEstimator, estimate_cost};

use models::{ModelPricing, TokenDirection};

use std::path::Path;

#[test]
fn given_mixed_case_extension_without_dot_when_added_then_it_is_normalized() {
    // GIVEN
    let mut estimator = TokenEstimator::new();

    // WHEN
    let added = estimator.add_code_extension("VUE");

    // THEN
    assert!(added);
    assert!(estimator.extensions().any(|ext| ext == ".vue"));
    assert!(estimator.is_code_extension(Path::new("src/App.vue")));
}

#[test]
fn given_extension_added_twice_when_adding_then_second_call_is_a_no_op() {
    let mut estimator = TokenEstimator::new();
    let before = estimator.extensions().count();

    assert!(estimator.add_code_extension(".svelte"));
    assert!(!estimator.add_code_extension("SVELTE"));
    assert!(!estimator.add_code_extension(".rs"));
    assert_eq!(estimator.extensions().count(), before + 1);
}

#[test]
fn given_blank_extension_when_added_then_rejected() {
    let mut estimator = TokenEstimator::new();

    assert!(!estimator.add_code_extension(""));
    assert!(!estimator.add_code_extension("."));
}

#[test]
fn given_default_estimator_when_checking_paths_then_only_known_extensions_count() {
    let estimator = TokenEstimator::default();

    assert_eq!(estimator.extensions().count(), DEFAULT_CODE_EXTENSIONS.len());
    assert!(estimator.is_code_extension(Path::new("main.RS")));
    assert!(estimator.is_code_extension(Path::new("README.md")));
    assert!(!estimator.is_code_extension(Path::new("logo.png")));
    assert!(!estimator.is_code_extension(Path::new("Makefile")));
}

/// **VALUE**: 2,000,000 input tokens at $3 per million cost exactly $6.00.
#[test]
fn given_three_dollar_input_price_when_estimating_two_million_tokens_then_six_dollars() {
    let pricing = ModelPricing::new(3.0, 15.0);

    let cost = estimate_cost(&pricing, 2_000_000, TokenDirection::Input);

    assert_eq!(cost, 6.0);
}

#[test]
fn given_output_direction_when_estimating_then_output_price_is_used() {
    let pricing = ModelPricing::new(3.0, 15.0);

    assert_eq!(estimate_cost(&pricing, 1_000_000, TokenDirection::Output), 15.0);
    assert_eq!(estimate_cost(&pricing, 0, TokenDirection::Output), 0.0);
}

#[test]
fn given_text_when_counting_tokens_then_count_is_positive_and_stable() {
    let estimator = TokenEstimator::new();

    let first = estimator.count_tokens("fn main() { println!(\"hello\"); }").expect("tokenizer loads");
    let second = estimator.count_tokens("fn main() { println!(\"hello\"); }").expect("tokenizer loads");

    assert!(first > 0);
    assert_eq!(first, second);
    assert_eq!(estimator.count_tokens("").expect("tokenizer loads"), 0);
}
