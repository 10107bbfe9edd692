use rand::RngCore;

use super::RandomProvider;

/// Splits text into lines, trimming each and dropping blank ones.
pub fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shuffles the non-blank lines of `text`. Returns `None` when there is
/// nothing to shuffle.
pub fn shuffle_lines<R: RngCore>(
    provider: &mut RandomProvider<R>,
    text: &str,
) -> Option<Vec<String>> {
    let mut items = non_blank_lines(text);
    if items.is_empty() {
        return None;
    }
    provider.shuffle(&mut items);
    Some(items)
}
