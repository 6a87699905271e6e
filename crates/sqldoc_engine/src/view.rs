use sqldoc_core::{AppViewModel, DownloadLink, Preview};

/// Rendering surface the controller drives.
pub trait View {
    /// Replace the preview and code areas with server-rendered HTML.
    fn show_preview(&mut self, preview: &Preview);
    /// Replace the preview area with an error message.
    fn show_error(&mut self, message: &str);
    /// `None` hides the progress indicator.
    fn set_progress(&mut self, progress: Option<u8>);
    /// `None` disables the download control.
    fn set_download(&mut self, link: Option<&DownloadLink>);
    /// While busy the submit control is disabled.
    fn set_busy(&mut self, busy: bool);
}

/// Pushes view-model changes into a [`View`], one capability call per changed field.
#[derive(Debug, Default)]
pub struct Renderer {
    last: AppViewModel,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, next: &AppViewModel, view: &mut dyn View) {
        let prev = &self.last;

        // An error occupies the preview area, so clearing it redraws the preview.
        let error_cleared = prev.error.is_some() && next.error.is_none();
        if next.preview != prev.preview || error_cleared {
            if let Some(preview) = &next.preview {
                view.show_preview(preview);
            }
        }
        if next.error != prev.error {
            if let Some(message) = &next.error {
                view.show_error(message);
            }
        }
        if next.progress != prev.progress {
            view.set_progress(next.progress);
        }
        if next.download != prev.download {
            view.set_download(next.download.as_ref());
        }
        if next.busy != prev.busy {
            view.set_busy(next.busy);
        }

        self.last = next.clone();
    }
}
