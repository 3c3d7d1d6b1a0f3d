//! # ScanKit Services
//!
//! The collaborator boundaries of the editor: AI OCR, translation, and
//! inpainting clients, the persistence API, image probing, and the
//! sequential chapter pipeline.
//!
//! Every collaborator sits behind a trait seam with an HTTP-backed
//! implementation; hosts and tests swap in their own. Failures at these
//! boundaries are non-fatal by design: they are caught at the call site,
//! surfaced as notifications, and leave the model unchanged.

mod http;

pub mod images;
pub mod inpaint;
pub mod ocr;
pub mod persistence;
pub mod pipeline;
pub mod translate;

pub use inpaint::{HttpInpaintClient, InpaintClient, MaskArea};
pub use ocr::{HttpOcrClient, OcrClient, OcrDetection};
pub use persistence::{HttpPersistenceClient, PersistenceClient};
pub use pipeline::{process_chapter, PipelineClients, PipelineSummary};
pub use translate::{
    HttpTranslationClient, TranslationClient, TranslationItem, TranslationResult,
};
