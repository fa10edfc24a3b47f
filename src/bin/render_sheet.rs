use omr_reader::config::sheet;
use omr_reader::image::io::{encode_png_data_url, save_grayscale_u8, write_json_file};
use omr_reader::layout::photograph;
use omr_reader::messages::ScanRequest;
use std::env;
use std::path::PathBuf;

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
        .ok_or_else(|| "usage: render_sheet <config.json>".to_string())?;
    let config = sheet::load_config(&config_path)?;
    let marks = config.marks()?;
    if marks.len() > config.num_questions {
        return Err(format!(
            "{} answers given for {} questions",
            marks.len(),
            config.num_questions
        ));
    }

    let mut image = config.layout.render_sheet(&marks, config.num_questions);
    if let Some(photo) = &config.photo {
        image = photograph(
            &image,
            photo.corner_points(),
            photo.width,
            photo.height,
            photo.background,
        )
        .ok_or_else(|| "photo corners do not define a valid perspective".to_string())?;
    }

    save_grayscale_u8(&image, &config.output_path)?;
    println!(
        "Sheet {}x{} with {} questions written to {}",
        image.width(),
        image.height(),
        config.num_questions,
        config.output_path.display()
    );

    if let Some(path) = &config.request_out {
        let request = ScanRequest::new(encode_png_data_url(&image)?, config.num_questions);
        write_json_file(path, &request)?;
        println!("Scan request written to {}", path.display());
    }
    Ok(())
}
