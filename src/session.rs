//
// session.rs
// Crop-Health-rs
//
// Front-end state holder: keeps only the latest report and preview, and discards outcomes from superseded requests.
//
// Thales Matheus Mendonça Santos - November 2025

use tracing::debug;

use crate::catalog::CropType;
use crate::models::AnalysisReport;
use crate::pipeline::AnalysisRequest;

/// Identifies the request an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
struct SelectedFile {
    filename: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    crop: CropType,
    file: Option<SelectedFile>,
    preview: Option<Vec<u8>>,
    latest: Option<AnalysisReport>,
    generation: u64,
    in_flight: bool,
}

impl AnalysisSession {
    pub fn new(crop: CropType) -> Self {
        Self {
            crop,
            file: None,
            preview: None,
            latest: None,
            generation: 0,
            in_flight: false,
        }
    }

    pub fn crop(&self) -> CropType {
        self.crop
    }

    pub fn latest(&self) -> Option<&AnalysisReport> {
        self.latest.as_ref()
    }

    pub fn preview(&self) -> Option<&[u8]> {
        self.preview.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight
    }

    /// Choosing a new file invalidates everything derived from the old one.
    pub fn select_file(&mut self, filename: impl Into<String>, bytes: Vec<u8>) {
        self.reset();
        self.preview = Some(bytes.clone());
        self.file = Some(SelectedFile {
            filename: filename.into(),
            bytes,
        });
    }

    /// Changing crop clears results and preview, including the selected file.
    pub fn set_crop_type(&mut self, crop: CropType) {
        self.crop = crop;
        self.reset();
        self.file = None;
    }

    /// Build a request for the current selection; `None` when no file is selected.
    pub fn begin(&mut self) -> Option<(Ticket, AnalysisRequest)> {
        let file = self.file.as_ref()?;
        self.generation += 1;
        self.in_flight = true;
        let request = AnalysisRequest::new(file.bytes.clone(), file.filename.clone(), self.crop);
        Some((Ticket(self.generation), request))
    }

    /// Accept an outcome if its ticket is still current. Returns whether it was kept.
    pub fn complete(&mut self, ticket: Ticket, report: AnalysisReport) -> bool {
        if ticket.0 != self.generation || !self.in_flight {
            debug!(ticket = ticket.0, current = self.generation, "dropping stale outcome");
            return false;
        }
        self.in_flight = false;
        self.latest = Some(report);
        true
    }

    fn reset(&mut self) {
        // Bumping the generation orphans any request still running.
        self.generation += 1;
        self.in_flight = false;
        self.latest = None;
        self.preview = None;
    }
}
