//! Generic TOML file parsing.
//!
//! Used for both the properties file and the build description. Missing files
//! and syntax errors are reported as typed [`GleanerError`]s carrying the path,
//! so the CLI can attach suggestions.

use std::path::Path;

use crate::core::GleanerError;

/// Parse a TOML file into `T`.
///
/// # Errors
///
/// - [`GleanerError::ConfigNotFound`] if the file does not exist
/// - [`GleanerError::IoError`] if it cannot be read
/// - [`GleanerError::ConfigParseError`] if the TOML is invalid or does not match `T`
///
/// # Examples
///
/// ```rust,no_run
/// use gleaner::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Config {
///     name: String,
/// }
///
/// # fn example() -> Result<(), gleaner::core::GleanerError> {
/// let config: Config = parse_config(Path::new("gleaner.toml"))?;
/// println!("{}", config.name);
/// # Ok(())
/// # }
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T, GleanerError>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GleanerError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            GleanerError::IoError(e)
        }
    })?;

    toml::from_str(&content).map_err(|e| GleanerError::ConfigParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}
