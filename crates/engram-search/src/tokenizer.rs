//! Query and content tokenization.
//!
//! Lowercases, splits on punctuation and whitespace while keeping CJK runs
//! intact, then filters stop words and tokens shorter than two characters.

const MIN_TOKEN_CHARS: usize = 2;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "an", "as", "at", "be", "by", "in", "is", "it", "of", "on", "or", "to", "up", "we", "do",
    "the", "and", "for", "are", "was", "were", "with", "that", "this", "from", "have", "has",
    "had", "will", "would", "should", "could", "can", "may", "not", "but", "all", "any", "each",
    "into", "over", "then", "than", "when", "where", "which", "while", "about", "after", "before",
    "between", "both", "does", "how", "its", "more", "most", "other", "some", "such", "only",
    "out", "very", "use", "used", "using", "you", "your", "our", "their",
];

const CHINESE_STOP_WORDS: &[&str] = &[
    "的", "了", "是", "在", "我", "有", "和", "就", "不", "人", "都", "一个", "这个", "我们",
    "他们", "什么", "这些", "那些", "以及", "或者", "因为", "所以",
];

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{f900}'..='\u{faff}'
        | '\u{3040}'..='\u{30ff}'
        | '\u{ac00}'..='\u{d7af}'
    )
}

fn is_stop_word(token: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(&token) || CHINESE_STOP_WORDS.contains(&token)
}

/// Tokenize text for indexing and query matching.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_cjk = false;

    for c in text.chars() {
        let keep = c.is_alphanumeric();
        if !keep {
            flush(&mut current, &mut tokens);
            continue;
        }
        let cjk = is_cjk(c);
        if !current.is_empty() && cjk != current_is_cjk {
            // Boundary between latin and CJK runs.
            flush(&mut current, &mut tokens);
        }
        current_is_cjk = cjk;
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        if current.chars().count() >= MIN_TOKEN_CHARS && !is_stop_word(current) {
            tokens.push(current.clone());
        }
        current.clear();
    }
}
