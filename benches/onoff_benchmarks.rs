use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emg_onoff::batch::{process_channels, NamedChannel};
use emg_onoff::processing::{BandType, IirFilter};
use emg_onoff::{ActivitySegmenter, OnOffConfig, OnOffPipeline, SegmentationConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 1000.0;
const SIGNAL_LENGTHS: &[usize] = &[1_000, 10_000, 100_000];
const CHANNEL_COUNTS: &[usize] = &[1, 8, 16];

/// Resting noise with a burst in the middle third of the recording
fn synthetic_emg(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let noise = rng.gen_range(-0.02..0.02);
            if (len / 3..2 * len / 3).contains(&i) {
                noise + (2.0 * PI * 85.0 * t).sin()
            } else {
                noise
            }
        })
        .collect()
}

fn benchmark_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtering");

    for &len in SIGNAL_LENGTHS {
        group.throughput(Throughput::Elements(len as u64));
        let signal = synthetic_emg(len, 1);

        for order in [2, 3, 6] {
            let filter = IirFilter::butterworth(order, 0.04, BandType::Highpass).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("filtfilt_order{}", order), len),
                &signal,
                |b, signal| {
                    b.iter(|| filter.filtfilt(black_box(signal)).unwrap());
                },
            );
        }
    }

    group.bench_function("butterworth_design", |b| {
        b.iter(|| IirFilter::butterworth(black_box(4), black_box(0.04), BandType::Lowpass).unwrap());
    });

    group.finish();
}

fn benchmark_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    let segmenter = ActivitySegmenter::new(SegmentationConfig::default(), SAMPLE_RATE).unwrap();

    for &len in SIGNAL_LENGTHS {
        group.throughput(Throughput::Elements(len as u64));
        let envelope: Vec<f64> = synthetic_emg(len, 2).iter().map(|x| x.abs()).collect();

        group.bench_with_input(BenchmarkId::new("segment", len), &envelope, |b, envelope| {
            b.iter(|| segmenter.segment(black_box(envelope)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let pipeline = OnOffPipeline::new(OnOffConfig::default(), SAMPLE_RATE).unwrap();

    for &len in SIGNAL_LENGTHS {
        group.throughput(Throughput::Elements(len as u64));
        let raw = synthetic_emg(len, 3);

        group.bench_with_input(BenchmarkId::new("single_channel", len), &raw, |b, raw| {
            b.iter(|| pipeline.process(black_box(raw)).unwrap());
        });
    }

    for &channels in CHANNEL_COUNTS {
        let batch: Vec<NamedChannel> = (0..channels)
            .map(|k| NamedChannel::new(format!("ch{}", k), synthetic_emg(10_000, k as u64)))
            .collect();
        group.throughput(Throughput::Elements((channels * 10_000) as u64));

        group.bench_with_input(BenchmarkId::new("parallel_batch", channels), &batch, |b, batch| {
            b.iter(|| process_channels(black_box(batch), SAMPLE_RATE, &OnOffConfig::default()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_filtering,
    benchmark_segmentation,
    benchmark_end_to_end
);
criterion_main!(benches);
