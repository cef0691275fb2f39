use glam::DVec2;
use labyrinth_common::{ExitSignal, View};
use labyrinth_kernel::{DenseMaze, OPEN};

use crate::details::RendererDetails;
use crate::error::RenderError;
use crate::frame::{PixelSink, shade};
use crate::texture::TextureKind;

/// Stand-in for an infinite `deltaDist` when a ray component is zero.
const FAR: f64 = 1e30;

/// Multiplier applied to walls whose face points north or south.
pub const SIDE_SHADE: f64 = 0.75;

/// Which grid line a ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// A vertical line (east/west face).
    X,
    /// A horizontal line (north/south face).
    Y,
}

/// First non-open cell along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: (i64, i64),
    pub value: u8,
    pub side: HitSide,
    /// Distance along the view direction, not the Euclidean length.
    pub distance: f64,
    /// Fractional position of the hit along the wall face, in `[0, 1)`.
    pub wall_x: f64,
    pub ray: DVec2,
}

/// Walk the grid from the view position with a digital differential
/// analyzer until a non-open cell is entered.
///
/// `camera_x` runs from `-1` (column 0) to just below `1` (last column).
pub fn cast_ray(maze: &DenseMaze, view: &View, camera_x: f64) -> Result<RayHit, RenderError> {
    let pos = view.position;
    let ray = view.direction + view.plane * camera_x;
    let mut map_x = pos.x.floor() as i64;
    let mut map_y = pos.y.floor() as i64;

    let delta_x = if ray.x == 0.0 { FAR } else { (1.0 / ray.x).abs() };
    let delta_y = if ray.y == 0.0 { FAR } else { (1.0 / ray.y).abs() };

    let (step_x, mut side_x) = if ray.x == 0.0 {
        (1, FAR)
    } else if ray.x < 0.0 {
        (-1, (pos.x - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - pos.x) * delta_x)
    };
    let (step_y, mut side_y) = if ray.y == 0.0 {
        (1, FAR)
    } else if ray.y < 0.0 {
        (-1, (pos.y - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - pos.y) * delta_y)
    };

    let (value, side) = loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            HitSide::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            HitSide::Y
        };
        match maze.get(map_x, map_y) {
            None => return Err(RenderError::RayEscaped { x: map_x, y: map_y }),
            Some(OPEN) => continue,
            Some(value) => break (value, side),
        }
    };

    let distance = match side {
        HitSide::X => (map_x as f64 - pos.x + (1 - step_x) as f64 / 2.0) / ray.x,
        HitSide::Y => (map_y as f64 - pos.y + (1 - step_y) as f64 / 2.0) / ray.y,
    };
    let wall_x = match side {
        HitSide::X => pos.y + distance * ray.y,
        HitSide::Y => pos.x + distance * ray.x,
    };

    Ok(RayHit {
        cell: (map_x, map_y),
        value,
        side,
        distance,
        wall_x: wall_x - wall_x.floor(),
        ray,
    })
}

/// Cast the ray for screen column `x` and draw its textured wall slice.
///
/// The background is expected to be in place already. The hit texture's
/// action runs exactly once.
pub fn draw_column(
    details: &RendererDetails,
    view: &View,
    x: usize,
    sink: &mut impl PixelSink,
) -> Result<(), RenderError> {
    let (w, h) = (details.width(), details.height());
    let camera_x = 2.0 * x as f64 / w as f64 - 1.0;
    let hit = cast_ray(details.maze(), view, camera_x)?;

    let textures = details.textures();
    let (kind, texture) = textures
        .resolve(hit.value)
        .ok_or(RenderError::TextureIndexOutOfRange {
            value: hit.value,
            textures: textures.texture_count(),
        })?;

    let screen_h = h as i64;
    let line_height = if hit.distance <= 0.0 {
        screen_h
    } else {
        (h as f64 / hit.distance) as i64
    }
    .max(1);
    let draw_start = (screen_h / 2 - line_height / 2).max(0);
    let draw_end = (screen_h / 2 + line_height / 2).min(screen_h);

    let tex_w = texture.width();
    let mut tex_x = ((hit.wall_x * tex_w as f64) as usize).min(tex_w - 1);
    let mirrored = match hit.side {
        HitSide::X => hit.ray.x > 0.0,
        HitSide::Y => hit.ray.y < 0.0,
    };
    if mirrored {
        tex_x = tex_w - tex_x - 1;
    }

    let tex_h = texture.height();
    let step = tex_h as f64 / line_height as f64;
    let mut tex_pos = (draw_start - screen_h / 2 + line_height / 2) as f64 * step;
    for y in draw_start..draw_end {
        let tex_y = (tex_pos as usize).min(tex_h - 1);
        tex_pos += step;
        let mut color = texture.sample(tex_x, tex_y);
        if hit.side == HitSide::Y {
            color = shade(color, SIDE_SHADE);
        }
        sink.put(x, y as usize, color);
    }

    on_hit(kind, hit.distance, details.exit_signal());
    Ok(())
}

fn on_hit(kind: TextureKind, distance: f64, exit: &ExitSignal) {
    match kind {
        TextureKind::Exit => {
            if exit.record_hit(distance) {
                tracing::debug!(distance, "exit within reach");
            }
        }
        TextureKind::Entry | TextureKind::Wall => {}
    }
}
