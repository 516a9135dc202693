/// Errors raised while walking an rtnetlink response buffer.
///
/// Decoding is terminal: the iterator that produced one of these yields nothing afterwards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated {what}: need {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("{what} declares length {len}, but {available} bytes are available")]
    BadLength {
        what: &'static str,
        len: usize,
        available: usize,
    },
}
