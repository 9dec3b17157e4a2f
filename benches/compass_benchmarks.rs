use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qibla_compass::{
    DirectionReconciler, DisplayFrame, GeoCoordinate, HeadingNormalizer, KAABA, LocationSource,
    Notification, OrientationSource, PlatformCapabilities, QiblaCompass, RawOrientationSample,
    ScreenRotation, SessionId, SubscriptionHandle, great_circle_distance, normalize_sample,
    qibla_bearing,
};
use rand::prelude::*;
use rand_pcg::Pcg64;

// Pre-generated samples to keep RNG overhead out of the measurements
struct PreGeneratedSamples {
    samples: Vec<RawOrientationSample>,
    index: usize,
}

impl PreGeneratedSamples {
    fn new(count: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let samples = (0..count)
            .map(|_| {
                let alpha = rng.random_range(0.0..360.0);
                if rng.random_bool(0.25) {
                    RawOrientationSample::from_native_heading(alpha)
                } else {
                    RawOrientationSample::from_alpha(alpha, rng.random_bool(0.5))
                }
            })
            .collect();

        Self { samples, index: 0 }
    }

    fn next(&mut self) -> RawOrientationSample {
        let sample = self.samples[self.index];
        self.index = (self.index + 1) % self.samples.len();
        sample
    }
}

fn random_coordinates(count: usize, seed: u64) -> Vec<GeoCoordinate> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..count)
        .filter_map(|_| {
            GeoCoordinate::new(
                rng.random_range(-90.0..=90.0),
                rng.random_range(-180.0..=180.0),
            )
            .ok()
        })
        .collect()
}

struct BenchSensors;

impl OrientationSource for BenchSensors {
    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities::default()
    }

    fn request_permission(&mut self, _session: SessionId) {}

    fn subscribe(&mut self, _session: SessionId) -> SubscriptionHandle {
        SubscriptionHandle(1)
    }

    fn unsubscribe(&mut self, _handle: SubscriptionHandle) {}

    fn screen_rotation(&self) -> Option<ScreenRotation> {
        Some(ScreenRotation::Rotate90)
    }
}

struct BenchGps;

impl LocationSource for BenchGps {
    fn is_available(&self) -> bool {
        true
    }

    fn request_position(&mut self, _session: SessionId) {}
}

/// Benchmark a single Qibla bearing
fn bench_qibla_bearing(c: &mut Criterion) {
    let london = GeoCoordinate::new(51.5074, -0.1278).unwrap();

    c.bench_function("qibla_bearing", |b| {
        b.iter(|| qibla_bearing(black_box(london)))
    });
}

/// Benchmark bearings for a spread of observers
fn bench_bearing_batch(c: &mut Criterion) {
    let observers = random_coordinates(1_000, 42);

    c.bench_function("qibla_bearing_batch_1000", |b| {
        b.iter(|| {
            for observer in &observers {
                black_box(qibla_bearing(black_box(*observer)));
            }
        })
    });
}

/// Benchmark great-circle distance through n-vectors
fn bench_great_circle_distance(c: &mut Criterion) {
    let new_york = GeoCoordinate::new(40.7128, -74.0060).unwrap();

    c.bench_function("great_circle_distance", |b| {
        b.iter(|| great_circle_distance(black_box(new_york), black_box(KAABA)))
    });
}

/// Benchmark stateless sample normalization
fn bench_normalize_sample(c: &mut Criterion) {
    let mut samples = PreGeneratedSamples::new(1_024, 7);

    c.bench_function("normalize_sample", |b| {
        b.iter(|| {
            let sample = samples.next();
            normalize_sample(black_box(&sample), black_box(Some(ScreenRotation::Rotate90)))
        })
    });
}

/// Benchmark the gated normalizer after an implicit grant
fn bench_heading_normalizer(c: &mut Criterion) {
    let mut normalizer = HeadingNormalizer::new();
    normalizer.activate(PlatformCapabilities::default());
    let mut samples = PreGeneratedSamples::new(1_024, 11);

    c.bench_function("heading_normalizer_process", |b| {
        b.iter(|| {
            let sample = samples.next();
            normalizer.process(black_box(&sample), None)
        })
    });
}

/// Benchmark a reconciler heading update
fn bench_reconciler_update(c: &mut Criterion) {
    let mut reconciler = DirectionReconciler::default();
    reconciler.update_bearing(58.48, None);
    let mut heading = 0.0;

    c.bench_function("reconciler_update_heading", |b| {
        b.iter(|| {
            heading = (heading + 1.5) % 360.0;
            reconciler.update_heading(black_box(heading))
        })
    });
}

/// Benchmark the full per-sample session path, display sink included
fn bench_session_orientation(c: &mut Criterion) {
    let mut compass = QiblaCompass::new(
        BenchSensors,
        BenchGps,
        |_: Notification| {},
        |frame: &DisplayFrame| {
            black_box(frame.rounded_relative());
        },
    );
    let session = compass.activate();
    let new_york = GeoCoordinate::new(40.7128, -74.0060).unwrap();
    compass.on_location_result(session, Ok(new_york));
    let mut samples = PreGeneratedSamples::new(1_024, 3);

    c.bench_function("session_on_orientation", |b| {
        b.iter(|| {
            let sample = samples.next();
            compass.on_orientation(session, black_box(sample))
        })
    });
}

criterion_group!(
    benches,
    bench_qibla_bearing,
    bench_bearing_batch,
    bench_great_circle_distance,
    bench_normalize_sample,
    bench_heading_normalizer,
    bench_reconciler_update,
    bench_session_orientation
);
criterion_main!(benches);
