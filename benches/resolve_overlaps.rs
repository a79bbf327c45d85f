use std::sync::Arc;

use criterion::{
    criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration,
    Throughput,
};
use ndchunk::{
    array::{decode, resolve_overlaps, ArrayDescriptor, ChunkedArray, ElementEncoding, Endianness},
    region::Region,
    storage::MemoryChunkStore,
};

fn resolve(c: &mut Criterion) {
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);
    let mut group = c.benchmark_group("resolve_overlaps");
    group.plot_config(plot_config);

    let encoding = ElementEncoding::new_unsigned(2, Endianness::Little).unwrap();
    for size in [32u64, 64, 128] {
        let descriptor = ArrayDescriptor::new(
            vec![size; 3],
            vec![8u64; 3].try_into().unwrap(),
            encoding,
        )
        .unwrap();
        let region = Region::new_with_ranges(&[3..size - 3, 3..size - 3, 3..size - 3]);
        group.throughput(Throughput::Elements(region.num_elements()));
        group.bench_function(BenchmarkId::new("resolve", size), |b| {
            b.iter(|| resolve_overlaps(&descriptor, &region).unwrap());
        });
    }
    group.finish();
}

fn decode_elements(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for width in [1usize, 2, 4, 8] {
        let encoding = ElementEncoding::new_unsigned(width, Endianness::Big).unwrap();
        let count = 64u64 * 64 * 64;
        let bytes = vec![0xA5u8; usize::try_from(count).unwrap() * width];
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_function(BenchmarkId::new("uint", width), |b| {
            b.iter(|| decode(&bytes, &encoding, count).unwrap());
        });
    }
    group.finish();
}

fn retrieve_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("retrieve_region");
    let size = 128u64;
    let descriptor = ArrayDescriptor::new(
        vec![size; 3],
        vec![32u64; 3].try_into().unwrap(),
        ElementEncoding::new_signed(2, Endianness::Little).unwrap(),
    )
    .unwrap();
    let store = Arc::new(MemoryChunkStore::new());
    let chunks = descriptor.chunks_in_region(&descriptor.region_all()).unwrap();
    for chunk_indices in chunks.iter_indices() {
        store.set_chunk(&chunk_indices, vec![0x5Au8; 32 * 32 * 32 * 2]);
    }
    let array = ChunkedArray::new(store, descriptor);
    let region = Region::new_with_ranges(&[16..112, 16..112, 16..112]);
    group.throughput(Throughput::Elements(region.num_elements()));
    group.bench_function("sequential", |b| {
        b.iter(|| array.retrieve_region(&region).unwrap());
    });
    group.bench_function("parallel", |b| {
        b.iter(|| array.par_retrieve_region(&region).unwrap());
    });
    group.finish();
}

criterion_group!(benches, resolve, decode_elements, retrieve_region);
criterion_main!(benches);
