use std::fmt::Display;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// A camera, video file or image could not be opened.
    SourceOpen(String),
    InvalidArgument(String),
    /// Channel index outside `0..3`.
    InvalidChannel(usize),
    OpenCv(opencv::Error),
    Io(std::io::Error),
    Window(String),
    Logger(log::SetLoggerError),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceOpen(what) => write!(f, "Error opening source: {}", what),
            Self::InvalidArgument(what) => write!(f, "Invalid argument: {}", what),
            Self::InvalidChannel(channel) => {
                write!(f, "Invalid channel {} (expected 0, 1 or 2)", channel)
            }
            Self::OpenCv(e) => write!(f, "OpenCV error: {}", e),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Window(what) => write!(f, "Window error: {}", what),
            Self::Logger(e) => write!(f, "Logger error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OpenCv(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Logger(e) => Some(e),
            _ => None,
        }
    }
}

impl From<opencv::Error> for Error {
    fn from(e: opencv::Error) -> Self {
        Self::OpenCv(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(e: log::SetLoggerError) -> Self {
        Self::Logger(e)
    }
}

/// Wraps anything coming out of the winit/glutin/imgui stack.
pub(crate) fn window_error(e: impl std::fmt::Debug) -> Error {
    Error::Window(format!("{:?}", e))
}
