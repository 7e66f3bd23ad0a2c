//! Identifier consistency.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::{quoted_list, CheckOptions};
use crate::accessor::DocumentAccessor;
use crate::error::Result;
use crate::report::Finding;

lazy_static! {
    /// Alien registration number: "A" followed by nine digits
    static ref A_NUMBER: Regex = Regex::new(r"A\d{9}").unwrap();
}

/// The document set must use exactly one A-Number.
pub fn check_a_number_consistency(
    doc: &dyn DocumentAccessor,
    _options: &CheckOptions,
) -> Result<Vec<Finding>> {
    let mut numbers = BTreeSet::new();
    for index in 0..doc.page_count() {
        let text = doc.page_text(index)?;
        numbers.extend(A_NUMBER.find_iter(&text).map(|m| m.as_str().to_string()));
    }

    let finding = match numbers.len() {
        0 => Finding::new("No A-Number found in the entire document set."),
        1 => return Ok(Vec::new()),
        _ => {
            let numbers: Vec<String> = numbers.into_iter().collect();
            Finding::new(format!(
                "Inconsistent A-Numbers found across documents. Numbers found: {}",
                quoted_list(&numbers)
            ))
        }
    };
    Ok(vec![finding])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::text_doc;

    fn run(pages: &[&[&str]]) -> Vec<String> {
        check_a_number_consistency(&text_doc(pages), &CheckOptions::default())
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_no_a_number() {
        assert_eq!(
            run(&[&["nothing here"]]),
            vec!["No A-Number found in the entire document set."]
        );
    }

    #[test]
    fn test_single_a_number_repeated() {
        assert!(run(&[&["A-Number: A123456789"], &["Ref A123456789"]]).is_empty());
    }

    #[test]
    fn test_inconsistent_a_numbers() {
        assert_eq!(
            run(&[&["A987654321"], &["A123456789 and A987654321"]]),
            vec!["Inconsistent A-Numbers found across documents. Numbers found: ['A123456789', 'A987654321']"]
        );
    }

    #[test]
    fn test_short_numbers_ignored() {
        assert_eq!(run(&[&["A12345678"]]).len(), 1);
        // Ten digits still contain a nine-digit match
        assert!(run(&[&["A1234567890"]]).is_empty());
    }
}
