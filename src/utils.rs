#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub text: String,
    pub word_vector: Vec<String>,
    pub n_words: usize,
}

impl Sequence {
    pub fn new(text: &str) -> Self {
        let word_vec = str_to_word_vec(text);
        let word_vec_len = word_vec.len();
        Sequence {
            text: text.to_string(),
            word_vector: word_vec,
            n_words: word_vec_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n_words == 0
    }
}

pub fn str_to_word_vec(string: &str) -> Vec<String> {
    string.split_whitespace().map(|s| s.to_string()).collect()
}

/// Stem and synonym lookups only see words made entirely of ASCII code points.
pub fn is_ascii_word(word: &str) -> bool {
    word.chars().all(|c| (c as u32) < 128)
}

/// Position of the first token equal to `word`.
pub fn first_position(tokens: &[String], word: &str) -> Option<usize> {
    tokens.iter().position(|t| t == word)
}
