//! Copying packages off a device.

use std::{
    collections::HashSet,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    catalog::CatalogNode, storage::Storage, utils::sanitize_file_name, XContentError, XContentResult,
};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("nothing selected to extract")]
    NothingSelected,

    /// The selection holds a folder-like node. Nothing was written.
    #[error("{node:?} cannot be extracted, only saves and shared items can")]
    NonExtractableSelection { node: String },

    /// Two nodes would be written to the same file. Nothing was written.
    #[error("more than one item would be written to {path:?}")]
    DestinationCollision { path: PathBuf },

    #[error("couldnt resolve a destination for {node:?}")]
    Destination {
        node: String,
        #[source]
        cause: XContentError,
    },

    /// Some items could not be copied. All others were.
    #[error("{} item(s) failed to extract", .0.len())]
    CopyFailed(Vec<CopyFailure>),
}

impl ExtractError {
    /// The per item failures of a [`ExtractError::CopyFailed`], empty otherwise.
    pub fn failures(&self) -> &[CopyFailure] {
        match self {
            ExtractError::CopyFailed(failures) => failures,
            _ => &[],
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("couldnt copy {node:?} to {destination:?}")]
pub struct CopyFailure {
    /// Display name of the item.
    pub node: String,
    pub path_on_device: String,
    pub destination: PathBuf,
    #[source]
    pub cause: XContentError,
}

/// Decides where each extracted item goes.
pub trait DestinationResolver {
    fn resolve(&mut self, node: &CatalogNode<'_>) -> XContentResult<PathBuf>;
}

/// Writes a single item to exactly this path.
#[derive(Debug, Clone)]
pub struct SaveAs(pub PathBuf);

impl DestinationResolver for SaveAs {
    fn resolve(&mut self, _node: &CatalogNode<'_>) -> XContentResult<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Writes every item into a directory, named after its on-device name.
/// Names already handed out get a ` (n)` suffix, counting up until the name is free.
#[derive(Debug, Clone)]
pub struct IntoDirectory {
    dir: PathBuf,
    taken: HashSet<String>,
}

impl IntoDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            taken: HashSet::new(),
        }
    }
}

impl DestinationResolver for IntoDirectory {
    fn resolve(&mut self, node: &CatalogNode<'_>) -> XContentResult<PathBuf> {
        let name = suggested_file_name(node);

        let mut file_name = name.clone();
        let mut n = 0;
        while self.taken.contains(&file_name) {
            n += 1;
            file_name = format!("{name} ({n})");
        }

        let path = self.dir.join(&file_name);
        self.taken.insert(file_name);
        Ok(path)
    }
}

impl<F> DestinationResolver for F
where
    F: FnMut(&CatalogNode<'_>) -> XContentResult<PathBuf>,
{
    fn resolve(&mut self, node: &CatalogNode<'_>) -> XContentResult<PathBuf> {
        self(node)
    }
}

/// The default file name for an extracted node: its raw on-device name.
pub fn suggested_file_name(node: &CatalogNode<'_>) -> String {
    sanitize_file_name(node.raw_name().unwrap_or_else(|| node.display_name()))
}

/// What an extraction wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: Vec<(PathBuf, u64)>,
}

impl ExtractSummary {
    pub fn total_bytes(&self) -> u64 {
        self.written.iter().map(|(_, len)| len).sum()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Copies the packages behind `nodes` to the paths `resolver` picks.
    ///
    /// The selection is checked up front: it must be non-empty, hold only
    /// leaves and map to distinct destinations, otherwise nothing is written.
    /// After that every item is attempted; failures are collected and
    /// returned together once all items have been tried.
    pub fn extract(
        &self,
        nodes: &[CatalogNode<'_>],
        resolver: &mut impl DestinationResolver,
    ) -> Result<ExtractSummary, ExtractError> {
        let plan = plan(nodes, resolver)?;

        let mut written = Vec::new();
        let mut failures = Vec::new();

        for (node, path_on_device, destination) in plan {
            match copy_one(&node, path_on_device, &destination) {
                Ok(len) => {
                    log::debug!("extracted {path_on_device:?} to {destination:?} ({len} bytes)");
                    written.push((destination, len));
                }
                Err(cause) => {
                    log::warn!("failed to extract {path_on_device:?} to {destination:?}: {cause}");
                    failures.push(CopyFailure {
                        node: node.display_name().into(),
                        path_on_device: path_on_device.into(),
                        destination,
                        cause,
                    });
                }
            }
        }

        log::info!(
            "extracted {} of {} item(s)",
            written.len(),
            written.len() + failures.len()
        );

        if failures.is_empty() {
            Ok(ExtractSummary { written })
        } else {
            Err(ExtractError::CopyFailed(failures))
        }
    }
}

type Plan<'a> = Vec<(CatalogNode<'a>, &'a str, PathBuf)>;

fn plan<'a>(
    nodes: &[CatalogNode<'a>],
    resolver: &mut impl DestinationResolver,
) -> Result<Plan<'a>, ExtractError> {
    if nodes.is_empty() {
        return Err(ExtractError::NothingSelected);
    }

    let mut leaves = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.path_on_device() {
            Some(path) if node.is_leaf() => leaves.push((*node, path)),
            _ => {
                return Err(ExtractError::NonExtractableSelection {
                    node: node.display_name().into(),
                })
            }
        }
    }

    let mut seen = HashSet::new();
    let mut plan = Vec::with_capacity(leaves.len());
    for (node, path) in leaves {
        let destination = resolver
            .resolve(&node)
            .map_err(|cause| ExtractError::Destination {
                node: node.display_name().into(),
                cause,
            })?;

        if !seen.insert(destination.clone()) {
            return Err(ExtractError::DestinationCollision { path: destination });
        }
        plan.push((node, path, destination));
    }

    Ok(plan)
}

fn copy_one(node: &CatalogNode<'_>, path_on_device: &str, destination: &Path) -> XContentResult<u64> {
    let package = node
        .package()
        .ok_or_else(|| anyhow::anyhow!("leaf without a package"))?;

    // open before creating the destination so a missing package leaves nothing behind
    let source = package.handle.open(path_on_device)?;
    write_file(&source, destination)
}

/// Creates or truncates `destination` and streams `source` into it. Once the
/// file was created, a failed copy removes it again.
fn write_file(source: &Storage, destination: &Path) -> XContentResult<u64> {
    let fp = fs::File::create(destination)?;

    let res = stream_into(source, fp);
    if res.is_err() {
        if let Err(e) = fs::remove_file(destination) {
            log::warn!("couldnt remove incomplete {destination:?}: {e}");
        }
    }
    res
}

fn stream_into(source: &Storage, fp: fs::File) -> XContentResult<u64> {
    let mut out = BufWriter::new(fp);
    let len = source.copy_to(&mut out)?;
    out.flush()?;
    Ok(len)
}
