//! Whole-file cleanup run after the pattern fixes.

pub mod blocks;
pub mod c_family;
pub mod python;

use crate::models::{Language, RuleSet};
use crate::tokenizer::Tokenizer;

pub fn run(tokenizer: &Tokenizer, rules: &RuleSet, text: &str) -> String {
    match tokenizer.language() {
        Language::Python => python::reformat(tokenizer, rules, text),
        Language::Java | Language::Cpp => c_family::respace(tokenizer, rules, text),
    }
}
