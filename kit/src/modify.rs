use std::{
    fs, io,
    path::{Path, PathBuf},
};

use argbind::{actions, ArgumentEnum, Bindable, FlagSet};

use crate::game::{tag_code, Game};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ArgumentEnum)]
pub enum Compression {
    #[default]
    None,
    Zlib,
    Lzma,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ArgumentEnum)]
pub enum Patch {
    #[argument(name = "rsa")]
    RsaKeys = 1,
    Crossdomain = 2,
    HostCheck = 4,
    Logging = 8,
}

#[derive(Debug, Default, Bindable)]
pub struct Output {
    #[argument(name = "output", alias = "o")]
    pub directory: String,

    #[argument(name = "overwrite")]
    pub overwrite: bool,
}

impl Output {
    /// The output directory, the working directory unless one was given
    #[must_use]
    pub fn directory(&self) -> &Path {
        if self.directory.is_empty() {
            Path::new(".")
        } else {
            Path::new(&self.directory)
        }
    }

    /// Writes `contents` to `file_name` inside the output directory
    fn write(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(self.directory())?;

        let path = self.directory().join(file_name);
        if !self.overwrite && path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists, pass --overwrite to replace it", path.display()),
            ));
        }

        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Options of a single modification run
#[derive(Debug, Default, Bindable)]
#[bind(actions)]
pub struct Modify {
    #[argument(name = "game", orphan_index = 0)]
    pub game: Option<Game>,

    #[argument(name = "compression", alias = "c")]
    pub compression: Compression,

    #[argument(name = "patches", alias = "p")]
    pub patches: FlagSet<Patch>,

    #[argument(name = "revision", alias = "r")]
    pub revision: Option<String>,

    #[argument(name = "limit")]
    pub limit: Option<u32>,

    #[argument(name = "verbose", alias = "v")]
    pub verbose: bool,

    #[argument(name = "version")]
    pub version: bool,

    #[argument(flatten)]
    pub output: Output,
}

#[actions]
impl Modify {
    #[argument(name = "dump-headers", alias = "dh")]
    fn dump_headers(&mut self, file_name: Option<String>) -> io::Result<()> {
        let game = self.game()?;
        let file_name = file_name.unwrap_or_else(|| format!("{}.headers.txt", game.name()));

        let path = self.output.write(&file_name, format!("{game:#?}\n").as_bytes())?;
        log::info!("Wrote header summary to {}", path.display());
        Ok(())
    }

    /// Writes the bodies of the first `count` tags with the given name or code,
    /// capped by `--limit`
    #[argument(name = "extract", alias = "x")]
    fn extract(&mut self, tag: String, #[default(1)] count: u32) -> io::Result<()> {
        let game = self.game()?;
        let code = tag_code(&tag).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("unknown tag {tag:?}"))
        })?;

        let count = self.limit.map_or(count, |limit| count.min(limit));
        let count = usize::try_from(count).unwrap_or(usize::MAX);

        let mut written = 0;
        for (index, record) in game
            .tags()?
            .into_iter()
            .filter(|record| record.code == code)
            .take(count)
            .enumerate()
        {
            let file_name = format!("{}.{code}.{index}.bin", game.name());
            let path = self.output.write(&file_name, record.body)?;
            log::debug!("Wrote {} bytes to {}", record.body.len(), path.display());
            written += 1;
        }

        if written == 0 {
            log::warn!("{} has no tag with code {code}", game.name());
        } else {
            log::info!("Extracted {written} tag(s) with code {code} from {}", game.name());
        }
        Ok(())
    }
}

impl Modify {
    fn game(&self) -> io::Result<&Game> {
        self.game
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no game client was given"))
    }

    /// Logs the loaded game and the options that were bound
    pub fn report(&self) {
        if let Some(game) = &self.game {
            log::info!(
                "Loaded {} (SWF version {}, {:?} compression, {} bytes uncompressed)",
                game.name(),
                game.version(),
                game.compression().unwrap_or_default(),
                game.declared_length()
            );
        }

        if self.verbose {
            log::info!(
                "Bound options: compression {:?}, patches {:?}, revision {}, limit {:?}, output {}",
                self.compression,
                self.patches,
                self.revision.as_deref().unwrap_or("unknown"),
                self.limit,
                self.output.directory().display()
            );
        }
    }
}
