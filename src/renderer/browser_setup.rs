//! Locating, downloading and launching Chrome/Chromium.

use anyhow::Context as _;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::utils::constants::{BROWSER_REQUEST_TIMEOUT_SECS, BROWSER_WINDOW_SIZE};

/// Environment variable naming an explicit browser executable
pub const BROWSER_PATH_ENV: &str = "CHROMIUM_PATH";

#[cfg(target_os = "windows")]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Chromium\Application\chrome.exe",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "~/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/homebrew/bin/chromium",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/usr/local/bin/chromium",
    "/opt/google/chrome/chrome",
];

/// Keeps profile directories of browsers launched by one process apart
static LAUNCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

const PATH_COMMANDS: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Handler errors that only mean chromiumoxide met a CDP event it cannot decode
const BENIGN_HANDLER_ERRORS: &[&str] = &[
    "data did not match any variant of untagged enum Message",
    "Failed to deserialize WS response",
];

/// A running browser process as returned by [`launch_browser`]
pub struct LaunchedBrowser {
    pub browser: Browser,
    /// Task draining CDP events; must be aborted once the browser is gone
    pub handler: JoinHandle<()>,
    /// Temporary profile directory, removed by the owner after exit
    pub user_data_dir: PathBuf,
}

fn expand_home(candidate: &str) -> Option<PathBuf> {
    match candidate.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(candidate)),
    }
}

fn search_path() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return None;
    }
    PATH_COMMANDS.iter().find_map(|cmd| {
        let output = std::process::Command::new("which").arg(cmd).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!found.is_empty()).then(|| PathBuf::from(found))
    })
}

/// Find an installed Chrome/Chromium.
///
/// Checks `$CHROMIUM_PATH`, then the usual install locations for the
/// platform, then `which` on Unix.
#[must_use]
pub fn find_browser_executable() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(BROWSER_PATH_ENV).map(PathBuf::from) {
        if explicit.exists() {
            info!(path = %explicit.display(), "Using browser from {BROWSER_PATH_ENV}");
            return Some(explicit);
        }
        warn!(path = %explicit.display(), "{BROWSER_PATH_ENV} does not exist, ignoring it");
    }

    let found = INSTALL_LOCATIONS
        .iter()
        .filter_map(|candidate| expand_home(candidate))
        .find(|path| path.exists())
        .or_else(search_path);

    match &found {
        Some(path) => info!(path = %path.display(), "Found installed browser"),
        None => debug!("No installed Chrome/Chromium found"),
    }
    found
}

/// Fetch a managed Chromium into the user cache directory.
///
/// Returns the path of the downloaded executable. Reuses a previous download.
pub async fn download_managed_browser() -> anyhow::Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("serp_links")
        .join("chromium");
    info!(dir = %cache_dir.display(), "Fetching managed Chromium");

    tokio::fs::create_dir_all(&cache_dir)
        .await
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Invalid browser fetcher options")?;
    let installation = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to download Chromium")?;

    info!(path = %installation.executable_path.display(), "Managed Chromium ready");
    Ok(installation.executable_path)
}

fn browser_config(
    executable: &Path,
    user_data_dir: &Path,
    headless: bool,
) -> anyhow::Result<BrowserConfig> {
    let (width, height) = BROWSER_WINDOW_SIZE;
    let builder = BrowserConfig::builder()
        .chrome_executable(executable)
        .user_data_dir(user_data_dir)
        .window_size(width, height)
        .request_timeout(Duration::from_secs(BROWSER_REQUEST_TIMEOUT_SECS));
    let builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder
        .args([
            "--no-first-run",
            "--no-default-browser-check",
            "--disable-notifications",
            "--disable-extensions",
            "--disable-background-networking",
            "--disable-breakpad",
            "--disable-features=TranslateUI",
            "--password-store=basic",
            "--use-mock-keychain",
            "--mute-audio",
        ])
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid browser configuration: {e}"))
}

/// Launch Chrome/Chromium with a fresh temporary profile.
///
/// Uses an installed browser when one is found, otherwise downloads one.
pub async fn launch_browser(headless: bool) -> anyhow::Result<LaunchedBrowser> {
    let executable = match find_browser_executable() {
        Some(path) => path,
        None => download_managed_browser().await?,
    };

    let launch = LAUNCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    let user_data_dir = std::env::temp_dir().join(format!(
        "serp_links_chrome_{}_{launch}",
        std::process::id()
    ));
    tokio::fs::create_dir_all(&user_data_dir)
        .await
        .with_context(|| format!("Failed to create profile dir {}", user_data_dir.display()))?;

    let config = browser_config(&executable, &user_data_dir, headless)?;
    info!(headless, executable = %executable.display(), "Launching browser");
    let (browser, mut events) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let Err(e) = event else { continue };
            let message = e.to_string();
            if BENIGN_HANDLER_ERRORS.iter().any(|m| message.contains(m)) {
                trace!("Ignoring undecodable CDP message: {message}");
            } else {
                error!("Browser handler error: {e:?}");
            }
        }
        debug!("Browser event handler stopped");
    });

    Ok(LaunchedBrowser {
        browser,
        handler,
        user_data_dir,
    })
}
