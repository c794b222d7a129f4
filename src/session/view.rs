//! Evaluation view: one workbook open for marking
//!
//! Owns the per-page session state, the annotation overlay and the sheet image
//! currently under it. Created when an evaluator opens a workbook and finished
//! by submission; nothing is persisted in between.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::messages::{EvalMsg, Update};
use super::state::{EvaluationSession, WorkbookInfo};
use crate::annotations::AnnotationOverlay;
use crate::capture::image::{ImageSource, SheetImage};
use crate::config::AppConfig;
use crate::core::submit::SubmissionSink;
use crate::domain::BoundingBox;
use crate::render;
use crate::surface::OverlayLayout;

/// Where the host currently displays the sheet and its positioned parent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportLayout {
    pub image_box: BoundingBox,
    pub parent_box: BoundingBox,
}

/// Layout as seen by the overlay: host boxes plus the loaded image's size
struct LiveLayout<'a> {
    viewport: &'a ViewportLayout,
    sheet: Option<&'a SheetImage>,
}

impl<'a> LiveLayout<'a> {
    fn new(viewport: &'a ViewportLayout, sheet: &'a Option<SheetImage>) -> Self {
        Self {
            viewport,
            sheet: sheet.as_ref(),
        }
    }
}

impl OverlayLayout for LiveLayout<'_> {
    fn natural_size(&self) -> Option<(u32, u32)> {
        self.sheet.map(|s| (s.width(), s.height()))
    }

    fn image_box(&self) -> BoundingBox {
        self.viewport.image_box
    }

    fn parent_box(&self) -> BoundingBox {
        self.viewport.parent_box
    }
}

pub struct EvaluationView {
    session: EvaluationSession,
    overlay: AnnotationOverlay,
    source: Box<dyn ImageSource>,
    sheet: Option<SheetImage>,
    layout: ViewportLayout,
    finished: bool,
}

impl EvaluationView {
    /// Open a workbook: mount the overlay, then load page 1 under it
    pub fn open(
        workbook: WorkbookInfo,
        config: &AppConfig,
        source: Box<dyn ImageSource>,
        layout: ViewportLayout,
    ) -> Self {
        log::info!(
            "Opening workbook {} ({} pages)",
            workbook.workbook_id,
            workbook.total_pages
        );
        let mut view = Self {
            session: EvaluationSession::new(workbook),
            overlay: AnnotationOverlay::new(config),
            source,
            sheet: None,
            layout,
            finished: false,
        };
        view.overlay
            .mount(&LiveLayout::new(&view.layout, &view.sheet));
        view.load_current_page();
        view
    }

    pub fn session(&self) -> &EvaluationSession {
        &self.session
    }

    pub fn overlay(&self) -> &AnnotationOverlay {
        &self.overlay
    }

    pub fn sheet(&self) -> Option<&SheetImage> {
        self.sheet.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn load_current_page(&mut self) {
        let page = self.session.page.current();
        let sheet = self.source.load_page(self.session.workbook_id(), page);
        self.sheet = Some(sheet);
        self.overlay
            .on_image_loaded(&LiveLayout::new(&self.layout, &self.sheet));
    }

    /// Handle one interaction
    ///
    /// Only submission can fail; the view stays open when it does.
    pub fn update(&mut self, msg: EvalMsg, sink: &mut dyn SubmissionSink) -> anyhow::Result<Update> {
        if self.finished {
            log::warn!("Evaluation already submitted; ignoring {:?}", msg);
            return Ok(Update::None);
        }

        match msg {
            EvalMsg::SelectTool(mode) => self.overlay.select_tool(mode),
            EvalMsg::ClearDrawings => self.overlay.clear(),
            EvalMsg::Pointer(event) => {
                return Ok(Update::Pointer(self.overlay.handle_pointer(&event)));
            }
            EvalMsg::ViewportResized(layout) => {
                self.layout = layout;
                self.overlay
                    .on_viewport_resize(&LiveLayout::new(&self.layout, &self.sheet));
            }
            EvalMsg::SelectMark(value) => self.session.mark.select(value),
            EvalMsg::EnterMark(input) => self.session.mark.enter(&input),
            EvalMsg::SetComment(text) => self.session.comment = text,
            EvalMsg::ToggleModelAnswer => self.session.toggle_model_answer(),
            EvalMsg::NextPage => return Ok(self.change_page(true)),
            EvalMsg::PreviousPage => return Ok(self.change_page(false)),
            EvalMsg::Submit => return self.submit(sink),
        }
        Ok(Update::None)
    }

    fn change_page(&mut self, forward: bool) -> Update {
        let moved = if forward {
            self.session.next_page()
        } else {
            self.session.previous_page()
        };
        if moved {
            // Annotations belong to the page they were drawn on
            self.overlay.clear();
            self.load_current_page();
        }
        Update::Page {
            moved,
            current: self.session.page.current(),
        }
    }

    fn submit(&mut self, sink: &mut dyn SubmissionSink) -> anyhow::Result<Update> {
        let raster = self.overlay.engine().export_png()?.unwrap_or_default();
        let payload = self.session.payload(raster);
        let ack = sink.submit(&payload)?;
        self.close();
        self.finished = true;
        Ok(Update::Submitted(ack))
    }

    /// Tear down the overlay (navigation away or submission)
    pub fn close(&mut self) {
        self.overlay.unmount();
    }

    /// Sheet image with the current annotations drawn over it
    pub fn composite(&self) -> Option<RgbaImage> {
        let mut img = self.sheet.as_ref()?.rgba.clone();
        if let Some(raster) = self.overlay.engine().raster() {
            render::image::composite_onto(&mut img, raster);
        }
        Some(img)
    }
}
