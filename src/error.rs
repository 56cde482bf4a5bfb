use crate::notes::NoteError;
use crate::session::SessionError;
use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Note(#[from] NoteError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
