// projection.rs - Perspective projection and depth cues
//
// Camera sits on the z axis looking at the trunk; z grows away from the
// viewer. There is no z-buffer, so depth only drives scale, fade and blur.

pub const FOV: f32 = 1000.0;

/// Particles at or in front of this depth are behind the camera.
pub const NEAR_CULL: f32 = -FOV + 50.0;

/// Screen center sits this far below the canvas midpoint.
pub const CENTER_Y_OFFSET: f32 = 50.0;

#[inline]
pub fn screen_center(width: f32, height: f32) -> (f32, f32) {
    (width / 2.0, height / 2.0 + CENTER_Y_OFFSET)
}

#[inline(always)]
pub fn depth_scale(z: f32) -> f32 {
    FOV / (FOV + z)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Project a scene point; None when it falls behind the camera.
#[inline]
pub fn project(x: f32, y: f32, z: f32, center: (f32, f32)) -> Option<Projected> {
    if z <= NEAR_CULL {
        return None;
    }
    Some(project_unculled(x, y, z, center))
}

/// Project without the near-plane test (stars sit far behind the tree).
#[inline]
pub fn project_unculled(x: f32, y: f32, z: f32, (cx, cy): (f32, f32)) -> Projected {
    let scale = depth_scale(z);
    Projected {
        x: x * scale + cx,
        y: y * scale + cy,
        scale,
    }
}

/// Depth-of-field terms. Focus plane is z = 0 (the trunk).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthCue {
    pub blur: f32,
    pub dof_alpha: f32,
    pub dist_alpha: f32,
}

impl DepthCue {
    #[inline]
    pub fn at(z: f32) -> Self {
        let blur = z.abs() / 400.0;
        Self {
            blur,
            dof_alpha: (1.0 - blur * 0.5).max(0.4),
            dist_alpha: ((z + 800.0) / 1000.0).clamp(0.0, 1.0),
        }
    }
}
