#![allow(unused)]
extern crate fitscope;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use fitscope::{codec::checksum, CodecConfig, FitFile};
use std::hint::black_box;

/// A synthetic one-hour activity: file_id plus 3600 one-second samples.
fn synthetic_activity() -> Vec<u8> {
    let mut payload = vec![0x40, 0x00, 0x00, 0x00, 0x00, 0x03];
    payload.extend_from_slice(&[0, 1, 0x00, 1, 2, 0x84, 2, 2, 0x84]);
    payload.extend_from_slice(&[0x00, 0x04, 0x01, 0x00, 0xF5, 0x10]);

    // record: timestamp, position_lat, position_long, heart_rate, cadence, speed
    payload.extend_from_slice(&[0x41, 0x00, 0x00, 0x14, 0x00, 0x06]);
    payload.extend_from_slice(&[
        253, 4, 0x86, 0, 4, 0x85, 1, 4, 0x85, 3, 1, 0x02, 4, 1, 0x02, 6, 2, 0x84,
    ]);
    for second in 0..3600u32 {
        payload.push(0x01);
        payload.extend_from_slice(&(1_000_000_000 + second).to_le_bytes());
        payload.extend_from_slice(&(566_000_000 + second as i32).to_le_bytes());
        payload.extend_from_slice(&(120_000_000 - second as i32).to_le_bytes());
        payload.push(120 + (second % 40) as u8);
        payload.push(85);
        payload.extend_from_slice(&(3000 + (second % 500) as u16).to_le_bytes());
    }

    let mut file = vec![14, 0x20];
    file.extend_from_slice(&2132u16.to_le_bytes());
    file.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    file.extend_from_slice(b".FIT");
    let header_crc = checksum::compute(&file);
    file.extend_from_slice(&header_crc.to_le_bytes());
    file.extend_from_slice(&payload);
    let crc = checksum::compute(&file);
    file.extend_from_slice(&crc.to_le_bytes());
    file
}

fn bench_codec(c: &mut Criterion) {
    let data = synthetic_activity();
    let file_size = data.len();

    println!(
        "Benchmarking synthetic activity: {} bytes ({:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(file_size as u64));

    group.bench_function("checksum", |b| {
        b.iter(|| black_box(checksum::compute(black_box(&data))));
    });

    group.bench_function("decode", |b| {
        b.iter(|| {
            let fit = FitFile::from_bytes(black_box(&data), CodecConfig::default()).unwrap();
            black_box(fit)
        });
    });

    let fit = FitFile::from_bytes(&data, CodecConfig::default()).unwrap();
    group.bench_function("encode_clean", |b| {
        b.iter(|| black_box(fit.to_memory().unwrap()));
    });

    group.bench_function("edit_encode", |b| {
        b.iter(|| {
            let mut fit = FitFile::from_bytes(&data, CodecConfig::default()).unwrap();
            fit.set_field(20, 3, 99u8).unwrap();
            black_box(fit.to_memory().unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
