use crate::FileType;

const MOC3_MAGIC: &[u8] = b"MOC3";
const MOC_MAGIC: &[u8] = b"moc";
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF_MAGIC: &[u8] = b"GIF8";
const BMP_MAGIC: &[u8] = b"BM";
const RIFF_MAGIC: &[u8] = b"RIFF";
const OGG_MAGIC: &[u8] = b"OggS";
const ID3_MAGIC: &[u8] = b"ID3";
const FLAC_MAGIC: &[u8] = b"fLaC";
const FTYP_MAGIC: &[u8] = b"ftyp";

impl FileType {
    /// Detect the type of decrypted resource bytes.
    ///
    /// Checks run in a fixed order: Live2D magic, image signatures, audio
    /// and video signatures, then a JSON parse. Never fails.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Self {
        // Live2D magic is checked first, so a MOC3 file is never mistaken for
        // anything more generic.
        if bytes.len() > 3 && bytes.starts_with(MOC3_MAGIC) {
            return FileType::Moc3;
        }
        if bytes.len() > 3 && bytes.starts_with(MOC_MAGIC) {
            return FileType::Moc;
        }
        if let Some(media) = Self::from_media_magic(bytes) {
            return media;
        }
        // Skipped string contents are not UTF-8 checked by serde_json.
        if std::str::from_utf8(bytes).is_ok_and(|s| serde_json::from_str::<serde::de::IgnoredAny>(s).is_ok()) {
            return FileType::Json;
        }
        FileType::Unknown
    }

    fn from_media_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            return Some(FileType::Png);
        }
        if bytes.starts_with(JPEG_MAGIC) {
            return Some(FileType::Jpeg);
        }
        if bytes.starts_with(GIF_MAGIC) {
            return Some(FileType::Gif);
        }
        if bytes.starts_with(BMP_MAGIC) {
            return Some(FileType::Bmp);
        }
        if bytes.starts_with(RIFF_MAGIC) && bytes.len() >= 12 {
            match &bytes[8..12] {
                b"WEBP" => return Some(FileType::Webp),
                b"WAVE" => return Some(FileType::Wav),
                _ => {},
            }
        }
        if bytes.starts_with(OGG_MAGIC) {
            return Some(FileType::Ogg);
        }
        if bytes.starts_with(FLAC_MAGIC) {
            return Some(FileType::Flac);
        }
        if bytes.starts_with(ID3_MAGIC) || Self::is_mpeg_frame(bytes) {
            return Some(FileType::Mp3);
        }
        if bytes.len() >= 12 && &bytes[4..8] == FTYP_MAGIC {
            return match &bytes[8..11] {
                b"M4A" => Some(FileType::M4a),
                _ => Some(FileType::Mp4),
            };
        }
        None
    }

    /// Bare MPEG audio frame sync without an ID3 header.
    fn is_mpeg_frame(bytes: &[u8]) -> bool {
        bytes.len() >= 2 && bytes[0] == 0xFF && matches!(bytes[1], 0xFB | 0xF3 | 0xF2)
    }
}
