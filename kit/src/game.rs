//! Just enough of the SWF header to describe a game client

use std::{error::Error, fmt, fs, io, path::PathBuf};

use argbind::FromToken;

use crate::modify::Compression;

const HEADER_LENGTH: usize = 8;

/// Record headers store the body length in the low six bits, this value means
/// a 32 bit length follows
const LONG_TAG: usize = 0x3f;

/// Tag codes that can be named on the command line
const TAG_NAMES: [(&str, u16); 12] = [
    ("End", 0),
    ("ShowFrame", 1),
    ("DefineShape", 2),
    ("SetBackgroundColor", 9),
    ("DoAction", 12),
    ("DefineBitsLossless", 20),
    ("DefineBitsJPEG2", 21),
    ("FileAttributes", 69),
    ("SymbolClass", 76),
    ("Metadata", 77),
    ("DoABC", 82),
    ("DefineBinaryData", 87),
];

/// Resolves a tag name (ignoring case) or a decimal tag code
#[must_use]
pub fn tag_code(name: &str) -> Option<u16> {
    TAG_NAMES
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
        .or_else(|| name.parse().ok())
}

/// A single tag record of an uncompressed file
#[derive(Clone, Copy, Debug)]
pub struct Tag<'a> {
    pub code: u16,
    pub body: &'a [u8],
}

pub struct Game {
    path: PathBuf,
    data: Vec<u8>,
}

impl Game {
    pub fn load(path: PathBuf) -> io::Result<Self> {
        let data = fs::read(&path)?;
        Self::from_bytes(path, data)
    }

    pub(crate) fn from_bytes(path: PathBuf, data: Vec<u8>) -> io::Result<Self> {
        if data.len() < HEADER_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "file is too short to be a game client",
            ));
        }

        let game = Self { path, data };
        if game.compression().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "file does not start with a SWF signature",
            ));
        }

        Ok(game)
    }

    #[must_use]
    pub fn compression(&self) -> Option<Compression> {
        match &self.data[..3] {
            b"FWS" => Some(Compression::None),
            b"CWS" => Some(Compression::Zlib),
            b"ZWS" => Some(Compression::Lzma),
            _ => None,
        }
    }

    #[must_use]
    pub fn version(&self) -> u8 {
        self.data[3]
    }

    /// Length of the uncompressed file, as declared in the header
    #[must_use]
    pub fn declared_length(&self) -> u32 {
        u32::from_le_bytes([self.data[4], self.data[5], self.data[6], self.data[7]])
    }

    /// Every tag record up to and including the `End` tag.
    ///
    /// Only uncompressed (`FWS`) files can be read.
    pub fn tags(&self) -> io::Result<Vec<Tag<'_>>> {
        if self.compression() != Some(Compression::None) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "tags can only be read from uncompressed game clients",
            ));
        }

        let body = &self.data[HEADER_LENGTH..];
        let rect_bits = usize::from(*body.first().ok_or_else(truncated)? >> 3);

        // Frame bounds, then frame rate and frame count
        let mut offset = (5 + 4 * rect_bits).div_ceil(8) + 4;

        let mut tags = vec![];
        while offset < body.len() {
            let header = usize::from(read_u16(body, offset)?);
            offset += 2;

            let code = (header >> 6) as u16;
            let mut length = header & LONG_TAG;
            if length == LONG_TAG {
                length = read_u32(body, offset)? as usize;
                offset += 4;
            }

            let end = offset
                .checked_add(length)
                .filter(|end| *end <= body.len())
                .ok_or_else(truncated)?;
            tags.push(Tag {
                code,
                body: &body[offset..end],
            });
            offset = end;

            if code == 0 {
                break;
            }
        }

        Ok(tags)
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn truncated() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "game client is truncated")
}

fn read_u16(data: &[u8], offset: usize) -> io::Result<u16> {
    match data.get(offset..offset + 2) {
        Some(&[a, b]) => Ok(u16::from_le_bytes([a, b])),
        _ => Err(truncated()),
    }
}

fn read_u32(data: &[u8], offset: usize) -> io::Result<u32> {
    match data.get(offset..offset + 4) {
        Some(&[a, b, c, d]) => Ok(u32::from_le_bytes([a, b, c, d])),
        _ => Err(truncated()),
    }
}

impl FromToken for Game {
    fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self::load(PathBuf::from(token))?)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("path", &self.path)
            .field("version", &self.version())
            .field("compression", &self.compression())
            .field("declared_length", &self.declared_length())
            .finish()
    }
}

/// Builds an uncompressed client with empty frame bounds around `tags`
#[cfg(test)]
pub(crate) fn uncompressed_client(tags: &[(u16, &[u8])]) -> Vec<u8> {
    let mut records = vec![0, 0, 24, 1, 0];
    for (code, body) in tags {
        if body.len() < LONG_TAG {
            let header = (code << 6) | body.len() as u16;
            records.extend_from_slice(&header.to_le_bytes());
        } else {
            let header = (code << 6) | LONG_TAG as u16;
            records.extend_from_slice(&header.to_le_bytes());
            records.extend_from_slice(&(body.len() as u32).to_le_bytes());
        }
        records.extend_from_slice(body);
    }
    records.extend_from_slice(&0_u16.to_le_bytes());

    let mut data = b"FWS\x0a".to_vec();
    data.extend_from_slice(&((HEADER_LENGTH + records.len()) as u32).to_le_bytes());
    data.extend(records);
    data
}
