/// Minimum useful phrase length; shorter candidates are noise
/// (stray terminators, single words like "Oui").
const MIN_PHRASE_CHARS: usize = 4;

/// Split raw script text into phrase units.
///
/// A phrase is a maximal run of characters ending in `.`, `!` or `?`,
/// with the terminator kept. Text after the last terminator (or the whole
/// input if it has no terminator) forms one final candidate. Candidates
/// are trimmed and dropped if at most 3 characters remain.
pub fn segment(raw: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut run = String::new();

    for ch in raw.chars() {
        run.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            flush(&mut phrases, &mut run);
        }
    }
    flush(&mut phrases, &mut run);

    phrases
}

fn flush(phrases: &mut Vec<String>, run: &mut String) {
    let trimmed = run.trim();
    if trimmed.chars().count() >= MIN_PHRASE_CHARS {
        phrases.push(trimmed.to_string());
    }
    run.clear();
}
