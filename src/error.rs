use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarmatError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Progress bar error: {0}")]
    Progress(#[from] indicatif::style::TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] marmat_common::Error),
}

pub type Result<T> = std::result::Result<T, MarmatError>;
