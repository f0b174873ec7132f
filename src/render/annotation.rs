use anyhow::Error;
use opencv::core::{Mat, MatTraitConst, Point, Scalar};
use opencv::imgproc;
use tracing::debug;
use crate::config::config::AnnotationConfig;
use crate::geometry::angle::AngleResult;
use crate::helper::pose_helper::Side;
use crate::utils::coordinate::{JointTriplet, PixelPoint};

const DEGREE_SIGN: char = '°';

/// Diagonal offsets of the dark halo drawn under the label.
const OUTLINE_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Drawing coordinates handed to OpenCV are clamped to this distance from the origin.
const DRAW_COORD_LIMIT: i32 = 1 << 14;

/// angle_label formats the text shown next to the shoulder.
pub fn angle_label(angle: &AngleResult) -> String {
    match angle {
        AngleResult::Degrees(deg) => format!("Angle: {deg:.1}{DEGREE_SIGN}"),
        AngleResult::Undetermined(_) => "Angle: N/A".to_string(),
    }
}

/// resolve_font maps a font name to a Hershey font face.
///
/// Unknown names fall back to `FONT_HERSHEY_SIMPLEX`.
pub fn resolve_font(name: &str) -> i32 {
    match name.trim().to_ascii_lowercase().as_str() {
        "simplex" => imgproc::FONT_HERSHEY_SIMPLEX,
        "plain" => imgproc::FONT_HERSHEY_PLAIN,
        "duplex" => imgproc::FONT_HERSHEY_DUPLEX,
        "complex" => imgproc::FONT_HERSHEY_COMPLEX,
        "triplex" => imgproc::FONT_HERSHEY_TRIPLEX,
        "complex_small" => imgproc::FONT_HERSHEY_COMPLEX_SMALL,
        "script_simplex" => imgproc::FONT_HERSHEY_SCRIPT_SIMPLEX,
        "script_complex" => imgproc::FONT_HERSHEY_SCRIPT_COMPLEX,
        other => {
            debug!(font = other, "font unavailable, using simplex");
            imgproc::FONT_HERSHEY_SIMPLEX
        }
    }
}

fn bgr(rgb: [u8; 3]) -> Scalar {
    Scalar::new(rgb[2] as f64, rgb[1] as f64, rgb[0] as f64, 0.0)
}

fn clamp_point(p: Point) -> Point {
    Point::new(
        p.x.clamp(-DRAW_COORD_LIMIT, DRAW_COORD_LIMIT),
        p.y.clamp(-DRAW_COORD_LIMIT, DRAW_COORD_LIMIT),
    )
}

fn to_cv_point(p: PixelPoint) -> Point {
    clamp_point(Point::new(p.x, p.y))
}

fn offset_point(p: Point, dx: i32, dy: i32) -> Point {
    Point::new(p.x.saturating_add(dx), p.y.saturating_add(dy))
}

fn label_anchor(shoulder: Option<PixelPoint>, cfg: &AnnotationConfig) -> Point {
    let anchor = match shoulder {
        Some(s) => offset_point(to_cv_point(s), cfg.label_offset.0, cfg.label_offset.1),
        None => Point::new(cfg.fallback_label_position.0, cfg.fallback_label_position.1),
    };
    clamp_point(anchor)
}

/// Annotator draws the skeleton, joint markers and angle label onto a copy of the photo.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: AnnotationConfig,
    font_face: i32,
}

impl Annotator {
    pub fn new(config: AnnotationConfig) -> Self {
        let font_face = resolve_font(&config.font);
        Annotator {
            config,
            font_face,
        }
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// render_annotation returns an annotated copy of `image`; `image` itself is left untouched.
    ///
    /// Segments are drawn only between present points and markers only at present points.
    /// The label is always drawn, next to the shoulder or at the fallback position.
    ///
    /// # Arguments
    /// * `image` - BGR source image
    /// * `triplet` - selected joints, possibly partial or empty
    /// * `angle` - measured angle
    /// * `side` - shoulder side
    ///
    /// # Returns
    /// * `Result<Mat, Error>`
    pub fn render_annotation(
        &self,
        image: &Mat,
        triplet: &JointTriplet,
        angle: &AngleResult,
        side: Side,
    ) -> Result<Mat, Error> {
        let mut canvas = image.try_clone()?;
        let cfg = &self.config;

        if let Some(s) = triplet.shoulder {
            for end in [triplet.elbow, triplet.hip].into_iter().flatten() {
                imgproc::line(
                    &mut canvas,
                    to_cv_point(s),
                    to_cv_point(end),
                    bgr(cfg.line_color),
                    cfg.line_width,
                    imgproc::LINE_8,
                    0,
                )?;
            }
        }

        let markers = [
            (triplet.shoulder, cfg.shoulder_color),
            (triplet.elbow, cfg.elbow_color),
            (triplet.hip, cfg.hip_color),
        ];
        for (point, color) in markers {
            if let Some(p) = point {
                imgproc::circle(
                    &mut canvas,
                    to_cv_point(p),
                    cfg.marker_radius,
                    bgr(color),
                    imgproc::FILLED,
                    imgproc::LINE_8,
                    0,
                )?;
            }
        }

        let anchor = label_anchor(triplet.shoulder, cfg);
        let text = angle_label(angle);
        debug!(%side, text = %text, x = anchor.x, y = anchor.y, "drawing angle label");

        for (ox, oy) in OUTLINE_OFFSETS {
            self.draw_label(&mut canvas, &text, offset_point(anchor, ox, oy), bgr(cfg.outline_color))?;
        }
        self.draw_label(&mut canvas, &text, anchor, bgr(cfg.label_color))?;

        Ok(canvas)
    }

    /// draw_label writes `text` with its top-left corner at `anchor`.
    ///
    /// Hershey fonts are ASCII only, so a trailing degree sign is drawn as a small ring.
    fn draw_label(&self, canvas: &mut Mat, text: &str, anchor: Point, color: Scalar) -> Result<(), Error> {
        let cfg = &self.config;
        let (body, degree) = match text.strip_suffix(DEGREE_SIGN) {
            Some(body) => (body, true),
            None => (text, false),
        };

        let mut baseline = 0;
        let size = imgproc::get_text_size(body, self.font_face, cfg.font_scale, cfg.font_thickness, &mut baseline)?;
        let origin = offset_point(anchor, 0, size.height);

        imgproc::put_text(
            canvas,
            body,
            origin,
            self.font_face,
            cfg.font_scale,
            color,
            cfg.font_thickness,
            imgproc::LINE_AA,
            false,
        )?;

        if degree {
            let radius = ((size.height as f64) * 0.2).round().max(2.0) as i32;
            let center = offset_point(anchor, size.width.saturating_add(radius).saturating_add(2), radius);
            imgproc::circle(
                canvas,
                center,
                radius,
                color,
                cfg.font_thickness.max(1),
                imgproc::LINE_AA,
                0,
            )?;
        }

        Ok(())
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Annotator::new(AnnotationConfig::new())
    }
}

#[cfg(test)]
mod tests {
    use opencv::core::{CV_8UC3, Mat, MatTraitConst, Scalar, Vec3b};
    use opencv::imgproc;
    use crate::config::config::AnnotationConfig;
    use crate::geometry::angle::{AngleResult, UndeterminedReason};
    use crate::helper::pose_helper::Side;
    use crate::render::annotation::{angle_label, label_anchor, resolve_font, Annotator, DRAW_COORD_LIMIT};
    use crate::utils::coordinate::{JointTriplet, PixelPoint, PoseLandmark};

    const RED: [u8; 3] = [0, 0, 255];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [255, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];

    fn black(rows: i32, cols: i32) -> Mat {
        Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0)).unwrap()
    }

    fn pixel(img: &Mat, x: i32, y: i32) -> [u8; 3] {
        let px = img.at_2d::<Vec3b>(y, x).unwrap();
        [px[0], px[1], px[2]]
    }

    fn count_pixels(img: &Mat, xs: std::ops::Range<i32>, ys: std::ops::Range<i32>, pred: impl Fn([u8; 3]) -> bool) -> usize {
        let mut count = 0;
        for y in ys {
            for x in xs.clone() {
                if pred(pixel(img, x, y)) {
                    count += 1;
                }
            }
        }
        count
    }

    fn full_triplet() -> JointTriplet {
        JointTriplet {
            shoulder: Some(PixelPoint::new(200, 200)),
            elbow: Some(PixelPoint::new(300, 200)),
            hip: Some(PixelPoint::new(200, 320)),
        }
    }

    #[test]
    fn test_angle_label() {
        assert_eq!(angle_label(&AngleResult::Degrees(42.345)), "Angle: 42.3°");
        assert_eq!(angle_label(&AngleResult::Degrees(180.0)), "Angle: 180.0°");
        assert_eq!(angle_label(&AngleResult::Undetermined(UndeterminedReason::NoPersonDetected)), "Angle: N/A");
    }

    #[test]
    fn test_resolve_font_falls_back() {
        assert_eq!(resolve_font("triplex"), imgproc::FONT_HERSHEY_TRIPLEX);
        assert_eq!(resolve_font(" Duplex "), imgproc::FONT_HERSHEY_DUPLEX);
        assert_eq!(resolve_font("DejaVuSans-Bold.ttf"), imgproc::FONT_HERSHEY_SIMPLEX);
    }

    #[test]
    fn test_render_full_triplet() {
        let src = black(400, 400);
        let out = Annotator::default()
            .render_annotation(&src, &full_triplet(), &AngleResult::Degrees(90.0), Side::Left)
            .unwrap();

        assert_eq!(out.rows(), 400);
        assert_eq!(out.cols(), 400);
        assert_eq!(pixel(&out, 200, 200), RED);
        assert_eq!(pixel(&out, 300, 200), GREEN);
        assert_eq!(pixel(&out, 200, 320), BLUE);
        assert_eq!(pixel(&out, 200, 260), WHITE);

        // label sits above and to the right of the shoulder
        let lit = count_pixels(&out, 210..400, 170..195, |p| p != [0, 0, 0]);
        assert!(lit > 0);
    }

    #[test]
    fn test_render_leaves_source_untouched() {
        let src = black(400, 400);
        let _ = Annotator::default()
            .render_annotation(&src, &full_triplet(), &AngleResult::Degrees(90.0), Side::Right)
            .unwrap();
        assert_eq!(count_pixels(&src, 0..400, 0..400, |p| p != [0, 0, 0]), 0);
    }

    #[test]
    fn test_render_without_detection_uses_fallback_label() {
        let src = black(200, 300);
        let out = Annotator::default()
            .render_annotation(
                &src,
                &JointTriplet::empty(),
                &AngleResult::Undetermined(UndeterminedReason::NoPersonDetected),
                Side::Left,
            )
            .unwrap();

        assert_eq!(out.rows(), 200);
        assert_eq!(out.cols(), 300);
        assert!(count_pixels(&out, 8..300, 8..45, |p| p != [0, 0, 0]) > 0);
        assert_eq!(count_pixels(&out, 0..300, 60..200, |p| p != [0, 0, 0]), 0);
        assert_eq!(count_pixels(&out, 0..300, 0..200, |p| p == RED || p == GREEN || p == BLUE), 0);
    }

    #[test]
    fn test_render_partial_triplet() {
        let src = black(400, 400);
        let triplet = JointTriplet {
            shoulder: Some(PixelPoint::new(200, 200)),
            elbow: None,
            hip: Some(PixelPoint::new(200, 320)),
        };
        let out = Annotator::default()
            .render_annotation(
                &src,
                &triplet,
                &AngleResult::Undetermined(UndeterminedReason::MissingLandmark(PoseLandmark::LeftElbow)),
                Side::Left,
            )
            .unwrap();

        assert_eq!(pixel(&out, 200, 200), RED);
        assert_eq!(pixel(&out, 200, 320), BLUE);
        assert_eq!(pixel(&out, 200, 260), WHITE);
        assert_eq!(count_pixels(&out, 0..400, 0..400, |p| p == GREEN), 0);
        // no shoulder-elbow segment
        assert_eq!(count_pixels(&out, 220..400, 199..202, |p| p != [0, 0, 0]), 0);
    }

    #[test]
    fn test_render_without_shoulder() {
        let src = black(400, 400);
        let triplet = JointTriplet {
            shoulder: None,
            elbow: Some(PixelPoint::new(300, 200)),
            hip: Some(PixelPoint::new(200, 320)),
        };
        let out = Annotator::default()
            .render_annotation(
                &src,
                &triplet,
                &AngleResult::Undetermined(UndeterminedReason::MissingLandmark(PoseLandmark::LeftShoulder)),
                Side::Left,
            )
            .unwrap();

        assert_eq!(pixel(&out, 300, 200), GREEN);
        assert_eq!(pixel(&out, 200, 320), BLUE);
        assert_eq!(count_pixels(&out, 0..400, 0..400, |p| p == RED), 0);
        // markers only below the label band: no segments
        assert_eq!(
            count_pixels(&out, 0..400, 60..400, |p| p != [0, 0, 0] && p != GREEN && p != BLUE),
            0
        );
        // label at the fallback position
        assert!(count_pixels(&out, 8..300, 8..45, |p| p != [0, 0, 0]) > 0);
    }

    #[test]
    fn test_label_anchor_is_clamped() {
        let cfg = AnnotationConfig::new();
        let far = label_anchor(Some(PixelPoint::new(i32::MAX, i32::MIN)), &cfg);
        assert_eq!((far.x, far.y), (DRAW_COORD_LIMIT, -DRAW_COORD_LIMIT));

        let near = label_anchor(Some(PixelPoint::new(200, 200)), &cfg);
        assert_eq!((near.x, near.y), (210, 170));

        let fallback = label_anchor(None, &cfg);
        assert_eq!((fallback.x, fallback.y), (10, 10));
    }

    #[test]
    fn test_render_far_off_image_shoulder() {
        let src = black(480, 360);
        for shoulder in [PixelPoint::new(i32::MAX, i32::MIN), PixelPoint::new(i32::MIN, i32::MAX)] {
            let triplet = JointTriplet {
                shoulder: Some(shoulder),
                elbow: Some(PixelPoint::new(270, 240)),
                hip: Some(PixelPoint::new(180, 432)),
            };
            let out = Annotator::default()
                .render_annotation(&src, &triplet, &AngleResult::Degrees(3.2), Side::Left)
                .unwrap();

            assert_eq!(out.rows(), 480);
            assert_eq!(out.cols(), 360);
            assert_eq!(pixel(&out, 270, 240), GREEN);
            assert_eq!(pixel(&out, 180, 432), BLUE);
        }
    }

    #[test]
    fn test_render_uses_configured_style() {
        let mut cfg = AnnotationConfig::new();
        cfg.marker_radius = 10;
        cfg.shoulder_color = [10, 20, 30];
        cfg.font = "missing-font".to_string();
        let src = black(400, 400);
        let out = Annotator::new(cfg)
            .render_annotation(&src, &full_triplet(), &AngleResult::Degrees(12.5), Side::Left)
            .unwrap();

        assert_eq!(pixel(&out, 200, 200), [30, 20, 10]);
        assert_eq!(pixel(&out, 192, 200), [30, 20, 10]);
    }
}
