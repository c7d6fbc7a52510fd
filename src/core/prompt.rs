//! Instructional prompt prefixed to every commentary request.

pub const PROMPT_PREAMBLE: &str = "\
The text below, after ###, is a data stream most likely coming from the standard output of a Linux shell command.
Comment on what it likely is, what problems or normal operation you see, and generally share your thoughts on it.
###
";

pub const LENGTH_LIMIT_CLAUSE: &str = "\
Summarize it in one sentence at most if your findings are vague, indefinite, not specific, not interesting or speculative.
Otherwise stick to one paragraph at most.
";

pub const PROMPT_TERMINATOR: &str = "###";

/// The prompt text for one run. Built once from the `unlimited` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn new(unlimited: bool) -> Self {
        let mut text = String::from(PROMPT_PREAMBLE);
        if !unlimited {
            text.push_str(LENGTH_LIMIT_CLAUSE);
        }
        text.push_str(PROMPT_TERMINATOR);
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Prompt followed by `data`, or `None` when that would be the bare prompt.
    pub fn request(&self, data: &str) -> Option<String> {
        let request = format!("{}{}", self.text, data);
        if request == self.text {
            None
        } else {
            Some(request)
        }
    }
}
