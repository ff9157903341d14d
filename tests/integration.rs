#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::PathBuf;
    use watermarker::{BatchProcessor, ImageProcessor, WatermarkConfig, WatermarkError};

    fn font_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts/DejaVuSans.ttf")
    }

    fn config(text: &str, font_size: u32, opacity: u8) -> WatermarkConfig {
        WatermarkConfig {
            text: text.to_string(),
            font_path: Some(font_path()),
            font_size,
            opacity,
            margin_x: 0,
            margin_y: 0,
            ..Default::default()
        }
    }

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
        img.save_with_format(dir.child(name).path(), image::ImageFormat::Png)
            .unwrap();
    }

    fn output_names(dir: &TempDir) -> BTreeSet<String> {
        fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_red_square_gets_visible_watermark() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]))
            .save(input.child("red.png").path())
            .unwrap();

        let processor = BatchProcessor::new(config("X", 20, 255)).unwrap();
        let report = processor.run(input.path(), output.path(), |_, _, _| {}).unwrap();
        assert_eq!(report.processed, 1);

        let bytes = fs::read(output.child("red.png").path()).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);

        let result = image::load_from_memory(&bytes).unwrap();
        assert_eq!(result.dimensions(), (100, 100));
        assert!(result.to_rgb8().pixels().any(|p| p[1] > 100 && p[2] > 100));
    }

    #[test]
    fn test_batch_skips_invalid_files() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input, "one.png", 40, 30);
        write_png(&input, "two.PNG", 30, 40);
        input.child("corrupt.jpg").write_str("not really a jpeg").unwrap();
        input.child("notes.txt").write_str("ignored").unwrap();

        let processor = BatchProcessor::new(config("©", 16, 120)).unwrap();
        let report = processor.run(input.path(), output.path(), |_, _, _| {}).unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "corrupt.jpg");

        let expected: BTreeSet<String> = ["one.png", "two.PNG"].iter().map(|s| s.to_string()).collect();
        assert_eq!(output_names(&output), expected);
    }

    #[test]
    fn test_progress_is_reported_once_per_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for name in ["a.jpg", "b.png", "c.webp"] {
            let img = RgbImage::from_pixel(24, 24, Rgb([10, 200, 30]));
            img.save(input.child(name).path()).unwrap();
        }

        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        let mut calls = Vec::new();
        processor
            .run(input.path(), output.path(), |current, total, name| {
                calls.push((current, total, name.to_string()));
            })
            .unwrap();

        assert_eq!(calls.len(), 3);
        for (i, (current, total, _)) in calls.iter().enumerate() {
            assert_eq!(*current, i + 1);
            assert_eq!(*total, 3);
        }
        let names: BTreeSet<String> = calls.into_iter().map(|(_, _, n)| n).collect();
        assert_eq!(names, output_names(&output));
    }

    #[test]
    fn test_skipped_files_do_not_report_progress() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input, "good.png", 20, 20);
        input.child("bad.png").write_str("garbage").unwrap();

        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        let mut calls = Vec::new();
        processor
            .run(input.path(), output.path(), |current, total, name| {
                calls.push((current, total, name.to_string()));
            })
            .unwrap();

        assert_eq!(calls.len(), 1);
        let (current, total, name) = &calls[0];
        assert_eq!(name, "good.png");
        assert_eq!(*total, 2);
        assert!(*current == 1 || *current == 2);
    }

    #[test]
    fn test_output_directory_is_created() {
        let input = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        write_png(&input, "pic.png", 16, 16);
        let output = root.path().join("nested").join("out");

        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        processor.run(input.path(), &output, |_, _, _| {}).unwrap();
        assert!(output.join("pic.png").is_file());

        // Running again into the existing directory is fine.
        processor.run(input.path(), &output, |_, _, _| {}).unwrap();
    }

    #[test]
    fn test_transparent_input_is_flattened() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        RgbaImage::from_pixel(20, 20, Rgba([0, 0, 255, 40]))
            .save(input.child("alpha.png").path())
            .unwrap();

        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        processor.run(input.path(), output.path(), |_, _, _| {}).unwrap();

        // Output keeps the input name but always holds JPEG bytes.
        let bytes = fs::read(output.child("alpha.png").path()).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
        let result = image::load_from_memory(&bytes).unwrap();
        assert_eq!(result.dimensions(), (20, 20));
        assert!(!result.color().has_alpha());
    }

    #[test]
    fn test_missing_font_aborts_before_processing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input, "pic.png", 16, 16);

        let mut config = config("wm", 12, 120);
        config.font_path = Some(PathBuf::from("no/such/font.otf"));

        let result = BatchProcessor::new(config);
        assert!(matches!(result, Err(WatermarkError::FontLoad { .. })));
        assert!(output_names(&output).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_images_are_processed() {
        let input = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&source, "real.png", 16, 16);
        write_png(&input, "plain.png", 16, 16);
        std::os::unix::fs::symlink(source.child("real.png").path(), input.child("linked.png").path())
            .unwrap();
        std::os::unix::fs::symlink(source.child("gone.png").path(), input.child("dangling.png").path())
            .unwrap();

        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        let report = processor.run(input.path(), output.path(), |_, _, _| {}).unwrap();

        assert_eq!(report.processed, 2);
        let expected: BTreeSet<String> =
            ["linked.png", "plain.png"].iter().map(|s| s.to_string()).collect();
        assert_eq!(output_names(&output), expected);
    }

    #[test]
    fn test_missing_input_directory() {
        let output = TempDir::new().unwrap();
        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        let result = processor.run(
            std::path::Path::new("does/not/exist"),
            output.path(),
            |_, _, _| {},
        );
        assert!(matches!(result, Err(WatermarkError::InvalidPath(_))));
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let input = TempDir::new().unwrap();
        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();
        let result = processor.run(input.path(), input.path(), |_, _, _| {});
        assert!(matches!(result, Err(WatermarkError::InvalidPath(_))));
    }

    #[test]
    fn test_empty_directory_reports_nothing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let processor = BatchProcessor::new(config("wm", 12, 120)).unwrap();

        let mut called = false;
        let report = processor
            .run(input.path(), output.path(), |_, _, _| called = true)
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(!called);
    }

    #[test]
    fn test_single_file_apply() {
        let input = TempDir::new().unwrap();
        write_png(&input, "in.png", 64, 48);
        let output = input.child("out").child("in.jpg");

        let processor = ImageProcessor::new(config("© test", 18, 200)).unwrap();
        processor.process(input.child("in.png").path(), output.path()).unwrap();

        assert!(output.path().is_file());
        let result = image::open(output.path()).unwrap();
        assert_eq!(result.dimensions(), (64, 48));
    }

    #[test]
    fn test_apply_rejects_invalid_image() {
        let input = TempDir::new().unwrap();
        input.child("fake.png").write_str("nope").unwrap();

        let processor = ImageProcessor::new(config("wm", 12, 120)).unwrap();
        let result = processor.process(input.child("fake.png").path(), input.child("out.jpg").path());
        assert!(matches!(result, Err(WatermarkError::InvalidImage { .. })));
    }
}
