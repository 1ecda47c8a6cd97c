use crate::error::{ErrorKind, Result};
use crate::media::MediaIndex;
use exn::{OptionExt, ResultExt};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::instrument;
use zip::ZipArchive;

/// Database members, most recent schema first.
pub const DATABASE_MEMBERS: [&str; 2] = ["collection.anki21", "collection.anki2"];
pub const MEDIA_MEMBER: &str = "media";

/// Any seekable byte source a package can be read from.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

type Zip = ZipArchive<Box<dyn ReadSeek>>;

/// An opened package container.
///
/// Opening validates the layout (a database member and a media manifest) up
/// front; members are only decompressed when asked for.
pub struct Archive {
    zip: RefCell<Zip>,
    database: &'static str,
    media: MediaIndex,
}

impl Archive {
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).or_raise(|| ErrorKind::Archive)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes.into()))
    }

    pub fn from_reader(reader: impl Read + Seek + 'static) -> Result<Self> {
        let reader: Box<dyn ReadSeek> = Box::new(reader);
        let mut zip = ZipArchive::new(reader).or_raise(|| ErrorKind::Archive)?;
        tracing::debug!(members = zip.len(), "opened container");

        let database = DATABASE_MEMBERS
            .into_iter()
            .find(|member| zip.index_for_name(member).is_some())
            .ok_or_raise(|| ErrorKind::Format("no collection database member".to_string()))?;
        if zip.index_for_name(MEDIA_MEMBER).is_none() {
            exn::bail!(ErrorKind::Format("no media manifest member".to_string()));
        }
        let manifest = read_member(&mut zip, MEDIA_MEMBER)?;
        let media = MediaIndex::parse(&manifest, |member| zip.index_for_name(member).is_some())?;
        Ok(Self { zip: RefCell::new(zip), database, media })
    }

    /// Name of the member holding the collection database.
    #[must_use]
    pub fn database_member(&self) -> &str {
        self.database
    }

    /// Hand the (decompressing) database member to `consume`.
    ///
    /// # Panics
    /// If `consume` calls back into this archive.
    pub fn with_database<T>(&self, consume: impl FnOnce(&mut dyn Read) -> T) -> Result<T> {
        let mut zip = self.zip.borrow_mut();
        let mut member = zip.by_name(self.database).or_raise(|| ErrorKind::Archive)?;
        Ok(consume(&mut member))
    }

    /// Contents of the media file called `name`.
    #[instrument(level = "debug", skip(self))]
    pub fn read_media(&self, name: &str) -> Result<Vec<u8>> {
        let member = self.media.member(name).ok_or_raise(|| ErrorKind::NotFound(name.to_string()))?;
        read_member(&mut self.zip.borrow_mut(), member)
    }

    #[must_use]
    pub fn contains_media(&self, name: &str) -> bool {
        self.media.member(name).is_some()
    }

    /// Media display names, sorted.
    pub fn media_names(&self) -> impl Iterator<Item = &str> {
        self.media.names()
    }

    #[must_use]
    pub fn media(&self) -> &MediaIndex {
        &self.media
    }
}

fn read_member(zip: &mut Zip, member: &str) -> Result<Vec<u8>> {
    let mut file = zip.by_name(member).or_raise(|| ErrorKind::Archive)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).or_raise(|| ErrorKind::Archive)?;
    Ok(buf)
}
