//! Seedr REST client and the Stremio-facing shapes built from it.

pub mod client;
pub mod error;
pub mod manifest;
pub mod streams;

pub use {
    client::{Folder, FolderContents, SeedrClient, SeedrFile},
    error::{Error, Result},
    manifest::AddonManifest,
    streams::{Stream, StreamResponse, collect_files, is_playable, resolve_streams},
};
