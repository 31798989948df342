//! Render targets.
//!
//! A [`Surface`] is the root container the client draws into. Each render
//! replaces its whole contents.

use std::path::PathBuf;

use tokio::sync::watch;

use crate::error::ClientError;

/// The container a rendered page is written into.
pub trait Surface: Send {
    /// Replace everything in the container with `markup`.
    fn replace_contents(&mut self, markup: &str) -> Result<(), ClientError>;
}

/// One rendered frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Number of renders so far; 0 before the first.
    pub sequence: u64,
    /// Contents of the container.
    pub markup: String,
}

/// In-memory surface publishing each frame on a watch channel.
#[derive(Debug)]
pub struct MemorySurface {
    frames: watch::Sender<Frame>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        let (frames, _) = watch::channel(Frame::default());
        Self { frames }
    }

    /// Receive every frame rendered from now on.
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// The latest frame.
    pub fn current(&self) -> Frame {
        self.frames.borrow().clone()
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn replace_contents(&mut self, markup: &str) -> Result<(), ClientError> {
        self.frames.send_modify(|frame| {
            frame.sequence = frame.sequence.wrapping_add(1);
            markup.clone_into(&mut frame.markup);
        });
        Ok(())
    }
}

/// Surface writing a complete HTML page to a file on every render.
///
/// The page links `styles.css` next to it, so pointing this at the proxy's
/// `public/index.html` makes the proxy serve the latest render.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    /// Write frames to `path`.
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Surface for FileSurface {
    fn replace_contents(&mut self, markup: &str) -> Result<(), ClientError> {
        std::fs::write(&self.path, page(markup))?;
        Ok(())
    }
}

/// Wrap `markup` in the document holding the root container.
fn page(markup: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Mars Rover Dashboard</title>\n\
         <link rel=\"stylesheet\" href=\"styles.css\">\n\
         </head>\n\
         <body>\n\
         <div id=\"root\">{markup}</div>\n\
         </body>\n\
         </html>\n"
    )
}
