use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate layout: surface width {width}px cannot hold one {preferred}px cell")]
    DegenerateLayout { width: u32, preferred: f64 },

    #[error("Grid too large: {width}x{height}px surface with {preferred}px cells needs more than 4294967295 cells per axis")]
    GridTooLarge {
        width: u32,
        height: u32,
        preferred: f64,
    },

    #[error("Palette is empty: at least one image is required")]
    EmptyPalette,

    #[error("The composite has already been started")]
    AlreadyStarted,

    #[error("The composite has not been started")]
    NotStarted,

    #[error("Scroll direction {0} is currently unsupported")]
    UnsupportedDirection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a draw that failed with this error may succeed on a later tick.
    ///
    /// Only layout failures qualify: the surface size and preferred cell size
    /// can change between ticks, everything else is fixed configuration.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DegenerateLayout { .. } | Error::GridTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
