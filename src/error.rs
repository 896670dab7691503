// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed
    #[error("Config error: {0}")]
    Config(String), // A tunable or CLI value made no sense
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Glyph atlas error: {0}")]
    Atlas(String), // Atlas size is not a whole number of cells
}

pub type Result<T> = std::result::Result<T, Error>;
