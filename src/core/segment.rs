/// Sentence segmentation: paragraphs of sentences for narration and highlighting.
///
/// A deliberately naive punctuation splitter: abbreviations such as "e.g."
/// split early. That only changes playback granularity, never the text.

/// Sentence-ending punctuation.
const SENTENCE_ENDERS: &[char] = &['.', '!', '?'];

/// Split `text` into paragraphs of sentences.
///
/// Paragraphs are separated by one or more blank (whitespace-only) lines;
/// empty paragraphs are dropped.
pub fn segment(text: &str) -> Vec<Vec<String>> {
    split_paragraphs(text)
        .iter()
        .map(|paragraph| split_sentences(paragraph))
        .filter(|sentences| !sentences.is_empty())
        .collect()
}

/// Flatten paragraphs into narration order.
pub fn flatten(paragraphs: &[Vec<String>]) -> Vec<String> {
    paragraphs.iter().flatten().cloned().collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut paragraphs);
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    flush_paragraph(&mut current, &mut paragraphs);

    paragraphs
}

fn flush_paragraph(current: &mut String, paragraphs: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
    current.clear();
}

/// Split one paragraph on runs of `.`, `!`, `?` (and any whitespace after
/// them). Each sentence keeps its terminators; a trailing unterminated
/// remainder becomes the last sentence.
fn split_sentences(paragraph: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = paragraph.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !SENTENCE_ENDERS.contains(&c) {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if SENTENCE_ENDERS.contains(&next) || next.is_whitespace() {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }
        push_trimmed(&mut current, &mut sentences);
    }
    push_trimmed(&mut current, &mut sentences);

    sentences
}

fn push_trimmed(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
