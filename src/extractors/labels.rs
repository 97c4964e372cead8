// src/extractors/labels.rs
//! Builds regex fragments for report labels.
//!
//! The report generator is not under our control and drifts between
//! versions: `Cliques no link` vs `Cliques no Link`, `Impressões` vs
//! `Impressoes`. A label written once here matches all of those:
//! the first letter of every word matches either case, accented letters
//! also match their bare form, and any run of whitespace separates words.

/// Regex fragment for a single label.
pub fn label_pattern(label: &str) -> String {
    label
        .split_whitespace()
        .map(word_pattern)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Non-capturing alternation over synonymous labels.
pub fn alternation(labels: &[&str]) -> String {
    let parts: Vec<String> = labels.iter().map(|l| label_pattern(l)).collect();
    format!("(?:{})", parts.join("|"))
}

fn word_pattern(word: &str) -> String {
    word.chars()
        .enumerate()
        .map(|(idx, c)| char_pattern(c, idx == 0))
        .collect()
}

fn char_pattern(c: char, either_case: bool) -> String {
    let mut variants = vec![c];
    variants.extend(strip_accent(c));
    if either_case && c.is_alphabetic() {
        let base = variants.clone();
        for v in base {
            variants.extend(v.to_lowercase());
            variants.extend(v.to_uppercase());
        }
    }
    variants.sort_unstable();
    variants.dedup();

    if variants.len() == 1 {
        regex::escape(c.encode_utf8(&mut [0; 4]))
    } else {
        format!("[{}]", variants.into_iter().collect::<String>())
    }
}

/// Bare letter for the accented letters Portuguese uses.
fn strip_accent(c: char) -> Option<char> {
    let bare = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' => 'e',
        'É' | 'È' | 'Ê' => 'E',
        'í' | 'ì' | 'î' => 'i',
        'Í' | 'Ì' | 'Î' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        _ => return None,
    };
    Some(bare)
}
