//! Software rasterization primitives shared by the color and ID passes.
//!
//! Window coordinates have the origin at the top-left corner with y growing
//! downward; pixel centers sit at `+0.5`. Depth is clip `z / w` in `[0, 1]`.
//! Geometry is clipped against the near plane (`z >= 0` in clip space) and
//! the viewport; everything else is left to the depth test.

use glam::{Mat4, Vec3, Vec4};

/// Pulls lines slightly toward the eye so edges drawn on a surface win the
/// depth test against that surface.
pub(crate) const LINE_DEPTH_BIAS: f32 = 2e-5;

#[derive(Debug, Clone, Copy)]
struct ClipVert {
    pos: Vec4,
    shade: f32,
}

impl ClipVert {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            pos: self.pos.lerp(other.pos, t),
            shade: self.shade + (other.shade - self.shade) * t,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WinVert {
    x: f32,
    y: f32,
    z: f32,
    shade: f32,
}

fn to_window(v: ClipVert, width: u32, height: u32) -> WinVert {
    let ndc = v.pos.truncate() / v.pos.w;
    WinVert {
        x: (ndc.x + 1.0) * 0.5 * width as f32,
        y: (1.0 - ndc.y) * 0.5 * height as f32,
        z: ndc.z,
        shade: v.shade,
    }
}

/// Sutherland-Hodgman against the near plane.
fn clip_polygon_near(poly: &[ClipVert]) -> Vec<ClipVert> {
    let mut out = Vec::with_capacity(poly.len() + 1);
    for (i, &a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let a_in = a.pos.z >= 0.0;
        let b_in = b.pos.z >= 0.0;
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let t = a.pos.z / (a.pos.z - b.pos.z);
            out.push(a.lerp(b, t));
        }
    }
    out
}

fn edge(a: WinVert, b: WinVert, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Inclusive-start, exclusive-end pixel range covering `[lo, hi]`, clamped.
fn pixel_span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
    let start = lo.floor().clamp(0.0, limit as f32) as u32;
    let end = hi.ceil().clamp(0.0, limit as f32) as u32;
    (start, end)
}

fn fill_window_triangle(
    a: WinVert,
    b: WinVert,
    c: WinVert,
    width: u32,
    height: u32,
    plot: &mut impl FnMut(u32, u32, f32, f32),
) {
    let area = edge(a, b, c.x, c.y);
    if area.abs() <= f32::EPSILON || !area.is_finite() {
        return;
    }
    let (x0, x1) = pixel_span(a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x), width);
    let (y0, y1) = pixel_span(a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y), height);
    for y in y0..y1 {
        let py = y as f32 + 0.5;
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let z = w0 * a.z + w1 * b.z + w2 * c.z;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }
            let shade = w0 * a.shade + w1 * b.shade + w2 * c.shade;
            plot(x, y, z, shade);
        }
    }
}

/// Rasterize a world-space triangle. Both windings are filled.
///
/// `plot(x, y, depth, shade)` is called for every covered pixel center;
/// `shade` is interpolated from the per-vertex values.
pub(crate) fn fill_triangle(
    view_proj: &Mat4,
    world: [Vec3; 3],
    shade: [f32; 3],
    width: u32,
    height: u32,
    mut plot: impl FnMut(u32, u32, f32, f32),
) {
    let clip = [0, 1, 2].map(|i| ClipVert {
        pos: *view_proj * world[i].extend(1.0),
        shade: shade[i],
    });
    let poly = clip_polygon_near(&clip);
    if poly.len() < 3 {
        return;
    }
    let win: Vec<WinVert> = poly.iter().map(|v| to_window(*v, width, height)).collect();
    for i in 1..win.len() - 1 {
        fill_window_triangle(win[0], win[i], win[i + 1], width, height, &mut plot);
    }
}

/// Liang-Barsky clip of the window-space segment to the viewport box.
fn clip_segment(a: WinVert, b: WinVert, width: u32, height: u32) -> Option<(f32, f32)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let checks = [
        (-dx, a.x),
        (dx, width as f32 - a.x),
        (-dy, a.y),
        (dy, height as f32 - a.y),
    ];
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// Rasterize a world-space segment with a DDA walk.
///
/// `plot(x, y, depth)` receives the biased depth.
pub(crate) fn draw_line(
    view_proj: &Mat4,
    world: [Vec3; 2],
    width: u32,
    height: u32,
    mut plot: impl FnMut(u32, u32, f32),
) {
    let mut a = ClipVert {
        pos: *view_proj * world[0].extend(1.0),
        shade: 1.0,
    };
    let mut b = ClipVert {
        pos: *view_proj * world[1].extend(1.0),
        shade: 1.0,
    };
    match (a.pos.z >= 0.0, b.pos.z >= 0.0) {
        (false, false) => return,
        (false, true) => a = a.lerp(b, a.pos.z / (a.pos.z - b.pos.z)),
        (true, false) => b = b.lerp(a, b.pos.z / (b.pos.z - a.pos.z)),
        (true, true) => {}
    }
    let wa = to_window(a, width, height);
    let wb = to_window(b, width, height);
    let Some((t0, t1)) = clip_segment(wa, wb, width, height) else {
        return;
    };
    let at = |t: f32| {
        (
            wa.x + (wb.x - wa.x) * t,
            wa.y + (wb.y - wa.y) * t,
            wa.z + (wb.z - wa.z) * t,
        )
    };
    let (sx, sy, _) = at(t0);
    let (ex, ey, _) = at(t1);
    let steps = (ex - sx).abs().max((ey - sy).abs()).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = t0 + (t1 - t0) * (i as f32 / steps as f32);
        let (x, y, z) = at(t);
        if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
            continue;
        }
        let z = z - LINE_DEPTH_BIAS;
        if (0.0..=1.0).contains(&(z + LINE_DEPTH_BIAS)) {
            plot(x as u32, y as u32, z);
        }
    }
}

/// Rasterize a world-space point as a `size` x `size` square.
pub(crate) fn draw_point(
    view_proj: &Mat4,
    world: Vec3,
    size: u32,
    width: u32,
    height: u32,
    mut plot: impl FnMut(u32, u32, f32),
) {
    let clip = *view_proj * world.extend(1.0);
    if clip.z < 0.0 || clip.w <= 0.0 {
        return;
    }
    let v = to_window(ClipVert { pos: clip, shade: 1.0 }, width, height);
    if v.z > 1.0 {
        return;
    }
    let half = size.max(1) as f32 * 0.5;
    let (x0, x1) = pixel_span(v.x - half, v.x + half, width);
    let (y0, y1) = pixel_span(v.y - half, v.y + half, height);
    for y in y0..y1 {
        for x in x0..x1 {
            plot(x, y, v.z);
        }
    }
}
