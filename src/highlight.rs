/// Markdown emphasis wrapped around each highlighted keyword
pub const EMPHASIS: &str = "**";

/// Wrap every occurrence of each keyword in `**` emphasis.
///
/// Keywords are applied one after another, in the order given, each as a
/// literal case-sensitive replacement over the output of the previous one.
/// A later keyword therefore also sees the markers an earlier one inserted.
pub fn highlight<S: AsRef<str>>(text: &str, keywords: &[S]) -> String {
    keywords
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|k| !k.is_empty())
        .fold(text.to_string(), |acc, keyword| {
            acc.replace(keyword, &format!("{EMPHASIS}{keyword}{EMPHASIS}"))
        })
}

/// Split a comma-separated keyword list, dropping blanks
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
