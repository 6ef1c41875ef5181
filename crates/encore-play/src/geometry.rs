/// A 3-component vector in stage space. Only the operations the ring and
/// grid math need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Ring construction parameters, fixed for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingConfig {
    pub source_center: Vec3,
    pub target_center: Vec3,
    pub source_radius: f32,
    pub target_radius: f32,
    pub segment_count: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            source_center: Vec3::ZERO,
            target_center: Vec3::ZERO,
            source_radius: 5.0,
            target_radius: 5.0,
            segment_count: 36,
        }
    }
}

/// Precomputed circular sample points for arc segments.
///
/// Two equal-length rings, one point per angular segment index: segments
/// spawn on the source ring and travel to the matching index on the target
/// ring. Built once at session setup and shared read-only by every
/// in-flight arc train.
#[derive(Debug, Clone)]
pub struct RingPointTable {
    source: Vec<Vec3>,
    target: Vec<Vec3>,
}

impl RingPointTable {
    /// Build both rings. `segment_count` must be positive.
    pub fn new(config: &RingConfig) -> Self {
        assert!(config.segment_count > 0, "segment_count must be positive");

        let n = config.segment_count;
        let mut source = Vec::with_capacity(n);
        let mut target = Vec::with_capacity(n);
        let angle_step = std::f32::consts::TAU / n as f32;

        for i in 0..n {
            let angle = i as f32 * angle_step;
            let (sin, cos) = angle.sin_cos();
            source.push(Vec3::new(
                config.source_center.x + config.source_radius * cos,
                config.source_center.y + config.source_radius * sin,
                config.source_center.z,
            ));
            target.push(Vec3::new(
                config.target_center.x + config.target_radius * cos,
                config.target_center.y + config.target_radius * sin,
                config.target_center.z,
            ));
        }

        log::debug!("ring point table built with {n} points per ring");
        Self { source, target }
    }

    pub fn segment_count(&self) -> usize {
        self.source.len()
    }

    pub fn source_point(&self, index: usize) -> Vec3 {
        self.source[index]
    }

    pub fn target_point(&self, index: usize) -> Vec3 {
        self.target[index]
    }

    /// Index of the mirrored point at the half-ring offset.
    pub fn symmetric_index(&self, index: usize) -> usize {
        (index + self.segment_count() / 2) % self.segment_count()
    }
}
