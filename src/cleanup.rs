use regex::Regex;

/// Rule-based cleanup for recognition artifacts.
///
/// Two fixed passes over the text: literal character replacements first, then
/// the regex substitutions, each applied in table order, followed by a trim.
/// The tables are data, not logic; extend them here, not in the callers.
pub struct TextCleaner {
    replacements: Vec<(char, &'static str)>,
    patterns: Vec<(Regex, &'static str)>,
}

impl TextCleaner {
    pub fn new() -> Self {
        //Typical recognition confusions, mostly punctuation read as
        //underscores or exotic dots
        let replacements = vec![
            ('_', "."),
            ('،', ","),
            ('`', "."),
            ('\'', "."),
            ('。', "."),
            ('·', "."),
        ];

        let patterns = vec![
            (Regex::new(r"_{2,}"), "."),
            (Regex::new(r"\s*_\s*"), "."),
            (Regex::new(r"\.{2,}"), "."),
            (Regex::new(r"\s+\."), "."),
            (Regex::new(r"\.\s+"), ". "),
        ];
        let patterns = patterns
            .into_iter()
            .map(|(pattern, replacement)| {
                (pattern.expect("cleanup pattern is invalid"), replacement)
            })
            .collect();

        Self {
            replacements,
            patterns,
        }
    }

    pub fn process(&self, text: &str) -> String {
        let mut text = text.to_string();

        for (old, new) in &self.replacements {
            text = text.replace(*old, new);
        }

        for (pattern, replacement) in &self.patterns {
            text = pattern.replace_all(&text, *replacement).to_string();
        }

        text.trim().to_string()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}
