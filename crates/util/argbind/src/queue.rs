use std::{collections::VecDeque, fmt};

/// Every option token starts with this character
pub const OPTION_PREFIX: char = '-';

/// Whether a token names an option (`--name` or `-alias`) rather than carrying a value
#[must_use]
pub fn is_option(token: &str) -> bool {
    token.starts_with(OPTION_PREFIX)
}

/// The raw tokens of a command line, consumed front to back.
///
/// The queue is drained in place by the binder. Whatever is left once binding
/// finishes belongs to the caller.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArgumentQueue {
    tokens: VecDeque<String>,
}

impl ArgumentQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the arguments of the current process, without the program name
    #[must_use]
    pub fn from_env() -> Self {
        std::env::args().skip(1).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    /// Whether the front token is an option token
    #[must_use]
    pub fn next_is_option(&self) -> bool {
        self.peek().is_some_and(is_option)
    }

    /// Removes the front token, whatever it looks like
    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Removes the front token only if it is a value, not an option.
    ///
    /// Returns `None` (and leaves the queue untouched) if the queue is empty
    /// or the next token starts with [OPTION_PREFIX].
    pub fn pop_value(&mut self) -> Option<String> {
        if self.peek().is_some_and(|token| !is_option(token)) {
            self.tokens.pop_front()
        } else {
            None
        }
    }

    pub fn push_back(&mut self, token: impl Into<String>) {
        self.tokens.push_back(token.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// The tokens that have not been consumed yet
    #[must_use]
    pub fn into_remaining(self) -> Vec<String> {
        self.tokens.into()
    }
}

impl fmt::Debug for ArgumentQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl<S: Into<String>> FromIterator<S> for ArgumentQueue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for ArgumentQueue {
    fn from(value: [S; N]) -> Self {
        value.into_iter().collect()
    }
}

impl Extend<String> for ArgumentQueue {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::{is_option, ArgumentQueue};

    #[test]
    fn option_shape() {
        assert!(is_option("--limit"));
        assert!(is_option("-l"));
        assert!(is_option("-"));
        assert!(!is_option("limit"));
        assert!(!is_option(""));
    }

    #[test]
    fn pop_value_skips_options() {
        let mut queue = ArgumentQueue::from(["--verbose", "file.swf"]);

        assert_eq!(queue.pop_value(), None);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop().as_deref(), Some("--verbose"));
        assert_eq!(queue.pop_value().as_deref(), Some("file.swf"));
        assert!(queue.is_empty());
        assert_eq!(queue.pop_value(), None);
    }

    #[test]
    fn remaining_tokens_keep_their_order() {
        let mut queue: ArgumentQueue = ["a", "b", "c"].into_iter().collect();
        let _ = queue.pop();

        assert!(!queue.next_is_option());
        assert_eq!(queue.into_remaining(), vec!["b", "c"]);
    }
}
