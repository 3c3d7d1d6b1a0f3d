//! Viewport math: fit-to-view, anchored zoom, clamping, reset.

use scankit_canvas::Viewport;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn fit_to_view_scales_and_centers() {
    let mut vp = Viewport::new();
    vp.fit_to_view(1000.0, 1000.0, 800.0, 1200.0);

    // min(980/800, 980/1200)
    let expected_zoom = 980.0 / 1200.0;
    assert!(approx(vp.zoom(), expected_zoom), "zoom = {}", vp.zoom());

    let pan = vp.pan_offset();
    assert!(approx(pan.x, (1000.0 - 800.0 * expected_zoom) / 2.0), "pan.x = {}", pan.x);
    assert!(approx(pan.y, 10.0), "pan.y = {}", pan.y);
}

#[test]
fn fit_to_view_respects_global_zoom_bounds() {
    let mut vp = Viewport::new();
    // Tiny image in a huge container would need zoom > 5.
    vp.fit_to_view(10000.0, 10000.0, 10.0, 10.0);
    assert!(approx(vp.zoom(), 5.0));

    // Huge image in a tiny container would need zoom < 0.1.
    vp.fit_to_view(100.0, 100.0, 100000.0, 100000.0);
    assert!(approx(vp.zoom(), 0.1));
}

#[test]
fn zoom_at_point_keeps_the_anchor_fixed() {
    let mut vp = Viewport::new();
    vp.set_pan_offset(37.0, -12.0);
    vp.set_zoom(1.5);

    let anchor = (420.0, 310.0);
    let before = vp.container_to_page(anchor.0, anchor.1);
    vp.zoom_at_point(anchor.0, anchor.1, 1.25);
    let after = vp.container_to_page(anchor.0, anchor.1);

    assert!(approx(before.x, after.x), "{} vs {}", before.x, after.x);
    assert!(approx(before.y, after.y), "{} vs {}", before.y, after.y);
    assert!(approx(vp.zoom(), 1.875));
}

#[test]
fn zoom_at_point_clamps_and_still_anchors() {
    let mut vp = Viewport::new();
    vp.set_zoom(4.0);
    let anchor = (100.0, 100.0);
    let before = vp.container_to_page(anchor.0, anchor.1);

    // 4.0 * 2.0 clamps to 5.0; the anchor math must use the clamped ratio.
    vp.zoom_at_point(anchor.0, anchor.1, 2.0);
    assert!(approx(vp.zoom(), 5.0));
    let after = vp.container_to_page(anchor.0, anchor.1);
    assert!(approx(before.x, after.x));
    assert!(approx(before.y, after.y));
}

#[test]
fn set_zoom_clamps() {
    let mut vp = Viewport::new();
    vp.set_zoom(0.0001);
    assert!(approx(vp.zoom(), 0.1));
    vp.set_zoom(999.0);
    assert!(approx(vp.zoom(), 5.0));
}

#[test]
fn reset_recenters_at_unity_zoom() {
    let mut vp = Viewport::new();
    vp.set_zoom(3.0);
    vp.set_pan_offset(500.0, 500.0);

    vp.reset(1000.0, 800.0, 800.0, 1200.0);
    assert!(approx(vp.zoom(), 1.0));
    let pan = vp.pan_offset();
    assert!(approx(pan.x, 100.0));
    assert!(approx(pan.y, -200.0));
}

#[test]
fn coordinate_round_trip() {
    let mut vp = Viewport::new();
    vp.set_zoom(2.5);
    vp.set_pan_offset(-40.0, 60.0);

    let p = vp.container_to_page(123.0, 456.0);
    let (x, y) = vp.page_to_container(p.x, p.y);
    assert!(approx(x, 123.0));
    assert!(approx(y, 456.0));
}
