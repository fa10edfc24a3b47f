use omr_reader::config::scan::{self, ScanConfig};
use omr_reader::diagnostics::ScanReport;
use omr_reader::image::io::{load_raster_image, save_grayscale_u8, write_json_file};
use omr_reader::messages::ScanOutcome;
use omr_reader::preprocess::preprocess;
use omr_reader::rectify::rectify_with_transform;
use omr_reader::{OmrPipeline, RasterImage};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| "usage: omr_scan <config.json>".to_string())?;
    let config = scan::load_config(&config_path)?;

    let image = load_raster_image(&config.input_path)?;
    let pipeline = OmrPipeline::new(config.params.clone()).map_err(|e| e.to_string())?;
    let result = pipeline.process_with_diagnostics(&image, config.num_questions());

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            let message = ScanOutcome::Failure {
                reason: err.to_string(),
            }
            .to_message();
            let json = message
                .to_json()
                .map_err(|e| format!("Failed to serialize message: {e}"))?;
            println!("{json}");
            return Err(err.to_string());
        }
    };

    print_text_summary(&report);

    let message = ScanOutcome::Success(report.answers.clone()).to_message();
    let json = message
        .to_json()
        .map_err(|e| format!("Failed to serialize message: {e}"))?;
    println!("\nMessage:\n{json}");

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &image, &report, &config)?;
        println!("Debug artifacts written to {}", dir.display());
    }

    Ok(())
}

fn print_text_summary(report: &ScanReport) {
    let trace = &report.trace;
    println!("Scan summary");
    println!(
        "  input: {}x{} ({} channel{})",
        trace.input.width,
        trace.input.height,
        trace.input.channels,
        if trace.input.channels == 1 { "" } else { "s" }
    );
    println!(
        "  otsu: source={} page={}",
        trace.preprocess.threshold, trace.scoring.threshold
    );
    println!(
        "  contours={} anchor_candidates={}",
        trace.anchors.contours,
        trace.anchors.candidates.len()
    );
    for (i, c) in trace.anchors.candidates.iter().take(4).enumerate() {
        println!(
            "    #{i}: rect=({}, {}, {}x{}) area={:.0}",
            c.rect.x, c.rect.y, c.rect.width, c.rect.height, c.area
        );
    }
    let corners = &trace.rectify.corners;
    println!(
        "  corners: tl=({:.1}, {:.1}) tr=({:.1}, {:.1}) br=({:.1}, {:.1}) bl=({:.1}, {:.1}) area={:.0}",
        corners.top_left.x,
        corners.top_left.y,
        corners.top_right.x,
        corners.top_right.y,
        corners.bottom_right.x,
        corners.bottom_right.y,
        corners.bottom_left.x,
        corners.bottom_left.y,
        trace.rectify.quad_area
    );
    let timings: Vec<String> = trace
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "  timings (ms): {} total={:.3}",
        timings.join(" "),
        trace.timings.total_ms
    );
    println!("\nAnswers");
    for line in report.answer_lines() {
        println!("  {line}");
    }
}

fn save_debug_artifacts(
    dir: &Path,
    image: &RasterImage,
    report: &ScanReport,
    config: &ScanConfig,
) -> Result<(), String> {
    let pre = preprocess(image).map_err(|e| e.to_string())?;
    save_grayscale_u8(pre.mask.as_gray(), &dir.join("mask.png"))?;
    let page = rectify_with_transform(
        &pre.gray,
        &report.trace.rectify.transform,
        &config.params.rectify,
    )
    .map_err(|e| e.to_string())?;
    save_grayscale_u8(&page, &dir.join("rectified.png"))
}
