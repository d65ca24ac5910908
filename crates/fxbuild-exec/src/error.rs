use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{} not found — is it installed and on PATH?", program.display())]
    NotFound {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{} failed: {args:?}\n{stderr}", program.display())]
    CommandFailed {
        program: PathBuf,
        args: Vec<String>,
        stderr: String,
    },

    #[error("{} output was not valid UTF-8", program.display())]
    InvalidUtf8 {
        program: PathBuf,
        source: std::string::FromUtf8Error,
    },
}
