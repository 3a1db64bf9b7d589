use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?。։]+\s+)").unwrap());

/// Split text into batches that respect sentence boundaries.
///
/// Each batch is at most `max_batch_bytes` bytes. Sentences longer than the
/// limit are cut on character boundaries.
pub fn split_into_batches(text: &str, max_batch_bytes: usize) -> Vec<String> {
    if text.len() <= max_batch_bytes {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    let mut sentences: Vec<&str> = SENTENCE_END
        .find_iter(text)
        .map(|mat| {
            let sentence = &text[last_end..mat.end()];
            last_end = mat.end();
            sentence
        })
        .collect();
    if last_end < text.len() {
        sentences.push(&text[last_end..]);
    }

    for sentence in sentences {
        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_batch_bytes {
            push_batch(&mut batches, &current_batch);
            current_batch.clear();
        }

        if sentence.len() > max_batch_bytes {
            for chunk in chunk_by_bytes(sentence, max_batch_bytes) {
                push_batch(&mut batches, &chunk);
            }
        } else {
            current_batch.push_str(sentence);
        }
    }

    push_batch(&mut batches, &current_batch);
    batches
}

fn push_batch(batches: &mut Vec<String>, batch: &str) {
    let trimmed = batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
}

fn chunk_by_bytes(text: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for ch in text.chars() {
        if chunk.len() + ch.len_utf8() > max_bytes {
            chunks.push(std::mem::take(&mut chunk));
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
