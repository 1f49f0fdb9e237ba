//! Static asset mount.
//!
//! A mount registers `GET <prefix>/*filepath` and serves `filepath` from a
//! root directory. Absolute paths and `..` components never leave the root;
//! they, directories and missing files all answer 404.

use std::fs;
use std::path::{Component, Path, PathBuf};

use axum::http::StatusCode;

use super::context::Context;
use super::handler::{handler, HandlerFunc};

/// Name of the wildcard parameter every static mount captures.
pub const FILEPATH_PARAM: &str = "filepath";

/// Handler serving files below `root`.
pub fn static_handler(root: PathBuf) -> HandlerFunc {
    handler(move |ctx: &mut Context| {
        let Some(path) = resolve(&root, ctx.param(FILEPATH_PARAM)) else {
            ctx.status(StatusCode::NOT_FOUND);
            return;
        };

        match read_file(&path) {
            Some(contents) => {
                if let Err(err) = ctx.set_header("content-type", content_type(&path)) {
                    tracing::warn!(path = %path.display(), error = %err, "Content type rejected");
                }
                ctx.data(StatusCode::OK, contents);
            }
            None => ctx.status(StatusCode::NOT_FOUND),
        }
    })
}

fn resolve(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

fn read_file(path: &Path) -> Option<Vec<u8>> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    match fs::read(path) {
        Ok(contents) => Some(contents),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Static file unreadable");
            None
        }
    }
}

/// Guessed from the extension; textual types are declared UTF-8.
fn content_type(path: &Path) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_().as_str() == "text" && mime.get_param("charset").is_none() {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.to_string()
    }
}
