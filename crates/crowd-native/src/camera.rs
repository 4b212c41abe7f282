use glam::{Mat4, Vec3};

/// Right-handed perspective camera slowly orbiting the arena.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 14.0, -26.0),
            target: Vec3::new(0.0, 0.0, 6.0),
            up: Vec3::Y,
            aspect,
            fovy_radians: std::f32::consts::FRAC_PI_4,
            znear: 0.1,
            zfar: 200.0,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Swing the eye around the target on the XZ plane, keeping height and radius.
    pub fn orbit(&mut self, time: f32, radius: f32, speed: f32) {
        let angle = time * speed;
        self.eye = Vec3::new(
            self.target.x + radius * angle.sin(),
            self.eye.y,
            self.target.z - radius * angle.cos(),
        );
    }
}
