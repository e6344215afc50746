//! Writing the aggregated link list
//!
//! Data goes to the output file or stdout; diagnostics never do.

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{ScrapeError, ScrapeResult};

/// Newline-joined links with a trailing newline iff there is at least one
#[must_use]
pub fn render_links<'a, I>(links: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = String::new();
    for link in links {
        out.push_str(link);
        out.push('\n');
    }
    out
}

/// Write `links` to `path`, or to stdout when `path` is `None`.
///
/// Missing parent directories of `path` are created.
///
/// # Errors
///
/// Returns [`ScrapeError::Output`] if the file or stdout cannot be written.
pub async fn write_links<'a, I>(links: I, path: Option<&Path>) -> ScrapeResult<()>
where
    I: IntoIterator<Item = &'a String>,
{
    let data = render_links(links);

    match path {
        Some(path) => {
            let to_output_error = |source: std::io::Error| ScrapeError::Output {
                path: path.to_path_buf(),
                source,
            };

            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(to_output_error)?;
            }

            tokio::fs::write(path, data.as_bytes())
                .await
                .map_err(to_output_error)?;
            info!("Wrote results to {}", path.display());
        }
        None => {
            let to_output_error = |source: std::io::Error| ScrapeError::Output {
                path: PathBuf::from("<stdout>"),
                source,
            };

            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(data.as_bytes())
                .await
                .map_err(to_output_error)?;
            stdout.flush().await.map_err(to_output_error)?;
        }
    }

    Ok(())
}
