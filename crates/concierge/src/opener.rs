use std::io;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

#[cfg(test)]
use mockall::automock;

/// Opens a URL or path with whatever the platform uses by default
#[cfg_attr(test, automock)]
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Hands URLs to the user's default web browser
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

impl UrlOpener for BrowserOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        tracing::info!(url, "opening in default browser");
        webbrowser::open(url)
    }
}

/// Remembers every URL instead of launching a browser
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
