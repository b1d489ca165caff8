use thiserror::Error;

/// Failure of a request issued through a
/// [`Transport`](crate::host::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  #[error("network error: {0}")]
  Network(String),
  #[error("{url} answered with status {status}")]
  Status {
    status: u16,
    url:    String
  },
  #[error("could not decode response: {0}")]
  Decode(String)
}
