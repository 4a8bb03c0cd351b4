/// Errors that can occur while turning a navigation target into a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The pathname contains a percent-encoded sequence that does not decode to UTF-8
    InvalidPercentEncoding,
}

impl core::fmt::Display for LocationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::InvalidPercentEncoding => {
                "Pathname could not be decoded (invalid percent encoding)"
            }
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LocationError {}

/// Result type for location operations
pub type Result<T> = core::result::Result<T, LocationError>;
