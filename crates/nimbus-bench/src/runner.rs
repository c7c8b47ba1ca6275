use std::time::Instant;

use glam::Vec3;
use nimbus_core::SkyError;
use nimbus_sky::{
    PreparedSky, RecordingBackend, SkyPass, SkyPassReport, SkySurface, SkyView, StagePath,
    TessBuffer,
};

use crate::scenes::{SceneConfig, SceneGeometry};

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub surface_triangles: u32,
    pub faces_visible: u32,
    pub cloud_vertices: u32,
    pub frame_count: u32,
    pub timings: TimingSeries,
}

/// View switches shared by every scene in a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub show_sky: bool,
    pub fast_sky: bool,
    pub depth_fill: bool,
    pub z_far: Option<f32>,
}

/// Runs the sky pass against a recording backend, timing each frame.
pub struct BenchmarkRunner {
    sky: PreparedSky,
    options: RunOptions,
    frame_count: u32,
}

impl BenchmarkRunner {
    pub fn new(sky: PreparedSky, options: RunOptions, frame_count: u32) -> Self {
        Self {
            sky,
            options,
            frame_count,
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, SkyError> {
        log::info!(
            "Running scene '{}' ({}) with sky '{}'...",
            config.name,
            config.description,
            self.sky.material().name
        );

        let geometry = SceneGeometry::build(config);
        let view = SkyView {
            origin: Vec3::from_array(config.camera_position),
            z_far: self.options.z_far.unwrap_or(SkyView::default().z_far),
            show_sky: self.options.show_sky,
            fast_sky: self.options.fast_sky,
        };
        let surface = SkySurface {
            sky: &self.sky,
            stage_path: Some(if self.options.depth_fill {
                StagePath::DepthFill
            } else {
                StagePath::Generic
            }),
        };

        let mut pass = SkyPass::new();
        let mut tess = TessBuffer::default();
        let mut backend = RecordingBackend::new();
        let mut last = SkyPassReport::default();
        let mut frame_times = Vec::with_capacity(self.frame_count as usize);

        for _ in 0..self.frame_count {
            geometry.load_into(&mut tess)?;
            backend.clear();

            let frame_start = Instant::now();
            last = pass.run(&view, &surface, &mut tess, &mut backend)?;
            let elapsed = frame_start.elapsed().as_secs_f64() * 1000.0;
            frame_times.push(elapsed);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: {} faces, {} cloud vertices, {} draws, mean={:.3}ms, p95={:.3}ms",
            last.faces_visible,
            last.cloud_vertices,
            backend.draw_count(),
            timings.mean_ms,
            timings.p95_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            surface_triangles: geometry.triangle_count() as u32,
            faces_visible: last.faces_visible as u32,
            cloud_vertices: last.cloud_vertices as u32,
            frame_count: self.frame_count,
            timings,
        })
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
