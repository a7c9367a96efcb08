use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{FetchError, Result},
    traits::{Asset, Release},
};

/// A remote repository together with the releases synced for it so far.
///
/// Serializes to the persisted document shape `{ owner, name, releases }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub releases: Vec<GithubRelease>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRelease {
    pub id: u64,
    pub tag_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<GithubAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubAsset {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub size: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            releases: Vec::new(),
        }
    }

    /// `owner/name`, as used in API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn append_releases(&mut self, releases: Vec<GithubRelease>) {
        self.releases.extend(releases);
    }

    /// Writes the repository as a tab indented JSON document.
    pub fn to_json_writer<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
            .map_err(std::io::Error::from)?;

        let mut writer = serializer.into_inner();
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the repository to `path`, replacing any existing file.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.to_json_writer(BufWriter::new(file))
    }

    pub fn from_json_reader<R: Read>(reader: R, location: &str) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|source| {
            FetchError::Decode {
                location: location.to_string(),
                source,
            }
        })
    }

    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file), &path.display().to_string())
    }
}

impl Release for GithubRelease {
    type Asset = GithubAsset;

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> &str {
        &self.tag_name
    }

    fn is_draft(&self) -> bool {
        self.draft
    }

    fn is_prerelease(&self) -> bool {
        self.prerelease
    }

    fn assets(&self) -> &[Self::Asset] {
        &self.assets
    }
}

impl Asset for GithubAsset {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn url(&self) -> &str {
        &self.url
    }
}
