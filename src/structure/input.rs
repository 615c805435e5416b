use serde::Serialize;

const FORM_FEED: char = '\u{000C}';

/// Splits extractor output into pages on form feeds. Trailing blank pages are
/// dropped and NUL characters removed.
pub fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split(FORM_FEED)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    pages
}

pub fn page_lines(page: &str) -> Vec<String> {
    page.lines().map(str::to_string).collect()
}

pub fn split_page_lines(raw: &str) -> Vec<Vec<String>> {
    split_pages(raw).iter().map(|page| page_lines(page)).collect()
}

fn non_whitespace_char_count(text: &str) -> usize {
    text.chars().filter(|character| !character.is_whitespace()).count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub reason: String,
}

impl ValidationOutcome {
    fn rejected(reason: String) -> Self {
        Self {
            valid: false,
            reason,
        }
    }
}

/// Samples the first, middle and last page and requires each to carry at
/// least `min_chars` non-whitespace characters.
pub fn validate_pages<S: AsRef<str>>(pages: &[Vec<S>], min_chars: usize) -> ValidationOutcome {
    if pages.is_empty() {
        return ValidationOutcome::rejected("document has no pages".to_string());
    }

    let mut sampled = vec![0, pages.len() / 2, pages.len() - 1];
    sampled.dedup();

    for index in sampled {
        let chars = pages[index]
            .iter()
            .map(|line| non_whitespace_char_count(line.as_ref()))
            .sum::<usize>();
        if chars < min_chars {
            return ValidationOutcome::rejected(format!(
                "page {} has insufficient text content ({chars} characters)",
                index + 1
            ));
        }
    }

    ValidationOutcome {
        valid: true,
        reason: "pages validated".to_string(),
    }
}
