//! Conversions from CLI-facing enums to internal types.

use crate::{
    cli::{FkSource, Format},
    foreign_key::ForeignKeySource,
    output::OutputFormat
};

/// Converts a CLI format enum to the internal output format type.
///
/// # Example
///
/// ```
/// use sqlite_erd::{app::convert_format, cli::Format, output::OutputFormat};
///
/// let format = convert_format(Format::Json);
/// assert!(matches!(format, OutputFormat::Json));
/// ```
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml,
        Format::Html => OutputFormat::Html
    }
}

/// Converts the `--foreign-keys` value to the internal source type.
pub fn convert_fk_source(source: FkSource) -> ForeignKeySource {
    match source {
        FkSource::Catalog => ForeignKeySource::Catalog,
        FkSource::Ddl => ForeignKeySource::Ddl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_format_text() {
        assert!(matches!(convert_format(Format::Text), OutputFormat::Text));
    }

    #[test]
    fn test_convert_format_json() {
        assert!(matches!(convert_format(Format::Json), OutputFormat::Json));
    }

    #[test]
    fn test_convert_format_yaml() {
        assert!(matches!(convert_format(Format::Yaml), OutputFormat::Yaml));
    }

    #[test]
    fn test_convert_format_html() {
        assert!(matches!(convert_format(Format::Html), OutputFormat::Html));
    }

    #[test]
    fn test_convert_fk_source() {
        assert_eq!(convert_fk_source(FkSource::Catalog), ForeignKeySource::Catalog);
        assert_eq!(convert_fk_source(FkSource::Ddl), ForeignKeySource::Ddl);
    }
}
