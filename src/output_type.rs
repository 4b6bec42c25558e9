/// The supported output formats for cleaned transcripts.
///
/// Each variant maps to a concrete `CleanedEncoder` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Write the cleaned text verbatim.
    #[default]
    Text,

    /// Write a JSON array of `{cleaned_text, characters_processed, timestamps_removed}` objects.
    Json,
}
