//! Tests for the detection engine

use crate::detection::{
    DetectionError, DetectorConfig, ImageDetector, Region, ScreenImage, ScreenPoint,
    ScreenSource, StillScreen, threshold_schedule,
};
use crate::detection::error::DetectionResult;
use image::{Rgb, RgbImage};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Serves a fixed sequence of frames, repeating the last one, and counts captures
struct ScriptedScreen {
    frames: Vec<RgbImage>,
    captures: Cell<usize>,
}

impl ScriptedScreen {
    fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            captures: Cell::new(0),
        }
    }

    fn captures(&self) -> usize {
        self.captures.get()
    }
}

impl ScreenSource for ScriptedScreen {
    fn capture(&self, region: Option<Region>) -> DetectionResult<ScreenImage> {
        let n = self.captures.get();
        self.captures.set(n + 1);
        let frame = self.frames[n.min(self.frames.len() - 1)].clone();
        crate::detection::crop_to_region(frame, region).map(ScreenImage::new)
    }
}

fn textured(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)).wrapping_add(seed);
        Rgb([(v % 251) as u8, ((v * 7) % 241) as u8, ((v * 13) % 239) as u8])
    })
}

fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([12, 12, 12]))
}

fn crop(image: &RgbImage, x: u32, y: u32, w: u32, h: u32) -> RgbImage {
    image::imageops::crop_imm(image, x, y, w, h).to_image()
}

fn save(dir: &TempDir, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.path().join(name);
    image.save(&path).expect("write template");
    path
}

/// 64x48 screen with a 12x8 template cut from (20, 10); centroid is (26, 14)
fn screen_with_template() -> (TempDir, RgbImage, PathBuf) {
    let dir = TempDir::new().unwrap();
    let screen = textured(64, 48, 3);
    let template = save(&dir, "button.png", &crop(&screen, 20, 10, 12, 8));
    (dir, screen, template)
}

#[test]
fn test_find_returns_centroid() {
    let (_dir, screen, template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(screen));

    let found = detector.find(&template, 0.9, None);
    assert_eq!(found, Some(ScreenPoint::new(26, 14)));
}

#[test]
fn test_find_translates_region_offset() {
    let (_dir, screen, template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(screen));

    let region = Region::new(10, 5, 40, 30);
    let found = detector.find(&template, 0.9, Some(region));
    assert_eq!(found, Some(ScreenPoint::new(26, 14)));
}

#[test]
fn test_try_find_reports_confidence_and_template() {
    let (_dir, screen, template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(screen));

    let detection = detector.try_find(&template, 0.5, None).unwrap().unwrap();
    assert!(detection.confidence > 0.99);
    assert_eq!(detection.template, template);
}

#[test]
fn test_find_below_threshold_is_no_match() {
    let (_dir, _screen, template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(blank(64, 48)));

    assert_eq!(detector.find(&template, 0.5, None), None);
    assert!(detector.try_find(&template, 0.5, None).unwrap().is_none());
}

#[test]
fn test_large_template_on_near_flat_frame_is_no_match() {
    let dir = TempDir::new().unwrap();
    let template = save(&dir, "menu.png", &textured(400, 240, 5));
    let mut frame = RgbImage::from_pixel(640, 360, Rgb([250, 250, 250]));
    frame.put_pixel(320, 180, Rgb([251, 251, 251]));
    let detector = ImageDetector::new(StillScreen::new(frame));

    let best = detector.try_find(&template, -1.0, None).unwrap().unwrap();
    assert!(best.confidence < 0.1, "got {}", best.confidence);
    assert_eq!(detector.find(&template, 0.8, None), None);
}

#[test]
fn test_match_acceptance_is_monotonic_in_threshold() {
    let (_dir, screen, template) = screen_with_template();
    // Perturb the screen so the best score sits somewhere below 1.0
    let noisy = RgbImage::from_fn(screen.width(), screen.height(), |x, y| {
        let p = screen.get_pixel(x, y);
        let n = ((x * 7 + y * 3) % 41) as i32 - 20;
        let f = |c: u8| (c as i32 + n).clamp(0, 255) as u8;
        Rgb([f(p[0]), f(p[1]), f(p[2])])
    });
    let detector = ImageDetector::new(StillScreen::new(noisy));

    let thresholds: Vec<f32> = (1..=20).map(|i| i as f32 * 0.05).collect();
    let results: Vec<Option<ScreenPoint>> = thresholds
        .iter()
        .map(|t| detector.find(&template, *t, None))
        .collect();

    for (i, higher) in results.iter().enumerate() {
        if let Some(point) = higher {
            for lower in &results[..i] {
                assert_eq!(lower.as_ref(), Some(point));
            }
        }
    }
    assert!(results[0].is_some(), "Lowest threshold should match");
}

#[test]
fn test_oversized_template_never_matches() {
    let dir = TempDir::new().unwrap();
    let screen = textured(32, 32, 1);
    let wide = save(&dir, "wide.png", &textured(33, 8, 1));
    let tall = save(&dir, "tall.png", &textured(8, 33, 1));
    let detector = ImageDetector::new(StillScreen::new(screen));

    for threshold in [-1.0, 0.0, 0.5, 1.0] {
        assert_eq!(detector.find(&wide, threshold, None), None);
        assert_eq!(detector.find(&tall, threshold, None), None);
    }
    assert!(matches!(
        detector.try_find(&wide, 0.0, None),
        Err(DetectionError::TemplateTooLarge { .. })
    ));
}

#[test]
fn test_template_larger_than_region_never_matches() {
    let (_dir, screen, template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(screen));

    let region = Region::new(18, 8, 10, 10);
    assert_eq!(detector.find(&template, 0.0, Some(region)), None);
}

#[test]
fn test_missing_template_is_no_match() {
    let detector = ImageDetector::new(StillScreen::new(textured(16, 16, 0)));

    assert_eq!(detector.find("does/not/exist.png", 0.5, None), None);
    assert!(matches!(
        detector.try_find("does/not/exist.png", 0.5, None),
        Err(DetectionError::TemplateNotFound { .. })
    ));
}

#[test]
fn test_template_resolves_against_assets_root() {
    let (dir, screen, _template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(screen))
        .with_assets_dir(Some(dir.path().to_path_buf()));

    let found = detector.find(Path::new("button.png"), 0.9, None);
    assert_eq!(found, Some(ScreenPoint::new(26, 14)));
}

#[test]
fn test_region_outside_screen_is_no_match() {
    let (_dir, screen, template) = screen_with_template();
    let detector = ImageDetector::new(StillScreen::new(screen));

    let region = Region::new(50, 40, 30, 30);
    assert_eq!(detector.find(&template, 0.5, Some(region)), None);
    assert!(matches!(
        detector.try_find(&template, 0.5, Some(region)),
        Err(DetectionError::RegionOutOfBounds { .. })
    ));
}

#[test]
fn test_threshold_schedule() {
    let schedule = threshold_schedule(0.8, 0.6, 3);
    let expected = [0.8, 0.7333, 0.6667, 0.6];
    assert_eq!(schedule.len(), 4);
    for (got, want) in schedule.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "got {got}, want {want}");
    }

    assert_eq!(threshold_schedule(0.8, 0.6, 0), vec![0.8]);
}

#[test]
fn test_find_with_retry_exhausts_all_attempts() {
    let (_dir, _screen, template) = screen_with_template();
    let detector = ImageDetector::new(ScriptedScreen::new(vec![blank(64, 48)]));

    let start = Instant::now();
    let interval = Duration::from_millis(5);
    let found = detector.find_with_retry(&template, 0.8, 0.6, 3, None, interval);

    assert_eq!(found, None);
    assert_eq!(detector.source().captures(), 4);
    // Three pauses between four attempts, none after the last
    assert!(start.elapsed() >= interval * 3);
}

#[test]
fn test_find_with_retry_without_retries_tries_once() {
    let (_dir, _screen, template) = screen_with_template();
    let detector = ImageDetector::new(ScriptedScreen::new(vec![blank(64, 48)]));

    let found = detector.find_with_retry(&template, 0.8, 0.6, 0, None, Duration::from_secs(5));
    assert_eq!(found, None);
    assert_eq!(detector.source().captures(), 1);
}

#[test]
fn test_find_with_retry_returns_on_first_success() {
    let (_dir, screen, template) = screen_with_template();
    let detector = ImageDetector::new(ScriptedScreen::new(vec![blank(64, 48), screen]));

    let found = detector.find_with_retry(&template, 0.8, 0.6, 3, None, Duration::from_millis(1));
    assert_eq!(found, Some(ScreenPoint::new(26, 14)));
    assert_eq!(detector.source().captures(), 2);
}

#[test]
fn test_wait_for_times_out() {
    let (_dir, _screen, template) = screen_with_template();
    let detector = ImageDetector::new(ScriptedScreen::new(vec![blank(64, 48)]));

    let timeout = Duration::from_millis(60);
    let start = Instant::now();
    let found = detector.wait_for(&template, timeout, Duration::from_millis(10), 0.8, None);

    assert_eq!(found, None);
    assert!(start.elapsed() >= timeout);
    assert!(detector.source().captures() >= 1);
}

#[test]
fn test_wait_for_returns_when_template_appears() {
    let (_dir, screen, template) = screen_with_template();
    let frames = vec![blank(64, 48), blank(64, 48), screen];
    let detector = ImageDetector::new(ScriptedScreen::new(frames));

    let found = detector.wait_for(
        &template,
        Duration::from_secs(5),
        Duration::from_millis(5),
        0.8,
        None,
    );
    assert_eq!(found, Some(ScreenPoint::new(26, 14)));
    assert_eq!(detector.source().captures(), 3);
}

#[test]
fn test_wait_for_any_first_match_wins_without_waiting() {
    let dir = TempDir::new().unwrap();
    let screen = textured(64, 48, 3);
    let checkerboard = RgbImage::from_fn(10, 10, |x, y| {
        if (x / 2 + y / 2) % 2 == 0 {
            Rgb([250, 10, 10])
        } else {
            Rgb([10, 250, 10])
        }
    });
    let absent = save(&dir, "absent.png", &checkerboard);
    let present = save(&dir, "present.png", &crop(&screen, 30, 20, 10, 10));
    let detector = ImageDetector::new(ScriptedScreen::new(vec![screen]));

    let start = Instant::now();
    let found = detector.wait_for_any(
        &[absent, present.clone()],
        Duration::from_secs(10),
        Duration::from_secs(1),
        0.95,
        None,
    );

    assert_eq!(found, Some((present, ScreenPoint::new(35, 25))));
    assert_eq!(detector.source().captures(), 2);
    assert!(start.elapsed() < Duration::from_millis(900));
}

#[test]
fn test_wait_for_any_prefers_earlier_template_within_tick() {
    let dir = TempDir::new().unwrap();
    let screen = textured(64, 48, 3);
    let first = save(&dir, "first.png", &crop(&screen, 0, 0, 8, 8));
    let second = save(&dir, "second.png", &crop(&screen, 40, 30, 8, 8));
    let detector = ImageDetector::new(StillScreen::new(screen));

    let found = detector.wait_for_any(
        &[first.clone(), second],
        Duration::from_secs(1),
        Duration::from_millis(10),
        0.9,
        None,
    );
    assert_eq!(found.map(|(path, _)| path), Some(first));
}

#[test]
fn test_wait_for_any_times_out() {
    let (_dir, _screen, template) = screen_with_template();
    let detector = ImageDetector::new(ScriptedScreen::new(vec![blank(64, 48)]));

    let timeout = Duration::from_millis(40);
    let start = Instant::now();
    let found = detector.wait_for_any(&[&template], timeout, Duration::from_millis(10), 0.8, None);

    assert_eq!(found, None);
    assert!(start.elapsed() >= timeout);
}

#[test]
fn test_region_geometry() {
    let region = Region::new(100, 50, 20, 10);
    assert_eq!(region.center(), (110, 55));
    assert_eq!(region.to_screen(3, 4), (103, 54));
    assert!(region.contains_point(100, 50));
    assert!(!region.contains_point(120, 55));
    assert!(region.fits_within(120, 60));
    assert!(!region.fits_within(119, 60));
    assert!(!Region::new(0, 0, 0, 10).is_valid());
    assert_eq!(region.to_string(), "[100,50,20,10]");
}

#[test]
fn test_detector_config_defaults_and_partial_json() {
    let config = DetectorConfig::default();
    assert_eq!(config.threshold, 0.8);
    assert_eq!(config.min_threshold, 0.6);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.check_interval, Duration::from_secs(1));

    let parsed: DetectorConfig =
        serde_json::from_str(r#"{ "threshold": 0.9, "timeout": 2.5 }"#).unwrap();
    assert_eq!(parsed.threshold, 0.9);
    assert_eq!(parsed.timeout, Duration::from_millis(2500));
    assert_eq!(parsed.max_retries, 3);
}
