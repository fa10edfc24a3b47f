use log::{Level, LevelFilter, Log, Metadata, Record};
use omr_reader::layout::SheetLayout;
use omr_reader::{OmrParams, OmrPipeline};
use std::sync::Mutex;

/// Collects debug lines emitted by the library.
struct Capture(Mutex<Vec<String>>);

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) && record.target().starts_with("omr_reader") {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

#[test]
fn each_stage_logs_its_counts_once() {
    log::set_logger(&CAPTURE).expect("no other logger in this test binary");
    log::set_max_level(LevelFilter::Debug);

    let sheet = SheetLayout::default().render_blank();
    let pipeline = OmrPipeline::new(OmrParams::default()).expect("default params");
    pipeline.process(&sheet.into(), 20).expect("scan");

    let lines = CAPTURE.0.lock().expect("capture lock").clone();
    let count = |needle: &str| lines.iter().filter(|l| l.contains(needle)).count();
    assert_eq!(count("contours"), 1, "{lines:#?}");
    assert_eq!(count("candidates="), 1, "{lines:#?}");
    assert_eq!(count("otsu_threshold="), 2, "{lines:#?}");
}
