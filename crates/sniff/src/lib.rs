//! File type detection for decrypted LPK resources.
//!
//! Archive members carry no meaningful names, so the extension of every
//! recovered resource is guessed from its contents: Live2D model magic
//! first, then common image and audio signatures, then a JSON syntax check.
//! Detection is total; unrecognised data is [`FileType::Unknown`] and gets
//! no extension at all.

mod magic;

/// A detectable resource type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Cubism 3+ compiled model (.moc3)
    Moc3,
    /// Cubism 2 compiled model (.moc)
    Moc,
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    Wav,
    Ogg,
    Mp3,
    Flac,
    M4a,
    Mp4,
    /// Any syntactically valid JSON document (model, motion, physics, ...)
    Json,
    /// Nothing matched
    #[default]
    Unknown,
}

impl FileType {
    /// Returns the file extension for this type, including the leading dot.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Moc3 => ".moc3",
            FileType::Moc => ".moc",
            FileType::Png => ".png",
            FileType::Jpeg => ".jpg",
            FileType::Gif => ".gif",
            FileType::Bmp => ".bmp",
            FileType::Webp => ".webp",
            FileType::Wav => ".wav",
            FileType::Ogg => ".ogg",
            FileType::Mp3 => ".mp3",
            FileType::Flac => ".flac",
            FileType::M4a => ".m4a",
            FileType::Mp4 => ".mp4",
            FileType::Json => ".json",
            FileType::Unknown => "",
        }
    }
}

impl From<&[u8]> for FileType {
    fn from(value: &[u8]) -> Self {
        FileType::sniff(value)
    }
}

/// Guesses the extension (with leading dot) for decrypted bytes, or `""`.
#[must_use]
pub fn guess_extension(data: &[u8]) -> &'static str {
    FileType::sniff(data).extension()
}
